//! Diagnostic state, separated from the cancellation signal itself (the
//! source conflated the two in one enum-valued channel).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    Idle,
    Mining,
    ValidatingRemote,
}
