/// Result shaping for [`QueryExecutor::execute`](crate::executor::QueryExecutor::execute)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Reduce the result to its first row
    pub first: bool,
    /// Record the number of fetched rows in `rows_affected`
    pub count_rows: bool,
    /// Run the two-phase page query; the limit is read as `(page, size)`
    pub paginate: bool,
    /// Wrap rows as `{"data": ...}`
    pub envelope: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            first: false,
            count_rows: false,
            paginate: false,
            envelope: true,
        }
    }
}

impl ExecuteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(mut self) -> Self {
        self.first = true;
        self
    }

    pub fn count_rows(mut self) -> Self {
        self.count_rows = true;
        self
    }

    pub fn paginate(mut self) -> Self {
        self.paginate = true;
        self
    }

    /// Return bare rows instead of the `{"data": ...}` envelope
    pub fn raw(mut self) -> Self {
        self.envelope = false;
        self
    }
}
