pub mod demo;
pub mod pack;
pub mod read;

/// Represents a command in the bitqueue application.
pub trait Command {
    /// Consumes a command object and executes the handler actions
    /// associated with it.
    ///
    /// On failure, an error will be reported.
    fn handle(self) -> eyre::Result<()>;
}
