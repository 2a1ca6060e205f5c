use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing required setting: {0}")]
    Missing(&'static str),
}

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("could not rehydrate partial message: {0}")]
    Hydrate(String),
    #[error("dispatch to destination channel failed: {0}")]
    Send(String),
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to assemble receipt document: {0}")]
    Document(String),
}
