use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailerError {
    #[error("Missing email field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Could not assemble message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Could not render template: {0}")]
    Template(#[from] askama::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Writing message file failed: {0}")]
    File(#[from] lettre::transport::file::Error),

    #[error("Background send task failed: {0}")]
    Task(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
