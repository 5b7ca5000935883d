/// Per-request state carried through the response interceptor. The resubmit-once rule
/// lives here as an explicit flag rather than in recursive error handling.
#[derive(Clone, Debug)]
pub struct RequestContext {
    path: String,
    resubmitted: bool,
}

impl RequestContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            resubmitted: false,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn resubmitted(&self) -> bool {
        self.resubmitted
    }

    pub fn mark_resubmitted(&mut self) {
        self.resubmitted = true;
    }
}
