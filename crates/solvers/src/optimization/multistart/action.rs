/// Actions an observer can take during a multi-start run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current restart and return the incumbent.
    StopEarly,
}
