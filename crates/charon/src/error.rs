#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    #[error("caller process already killed")]
    CallerKilled,
    #[error("no device registered: major {0}")]
    DeviceNotFound(u32),
}
