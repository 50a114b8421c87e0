use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromoterSetError {
    #[error("duplicate promoter id: {0}")]
    DuplicateId(String),

    #[error("error parsing promoter record: {0}")]
    ParseError(String),

    #[error("cluster sizes ({requested}) exceed registry size ({available})")]
    ReassignOverflow { requested: usize, available: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum TadSetError {
    #[error("error parsing TAD record: {0}")]
    ParseError(String),

    #[error("unknown bin '{bin}' for TAD {tad}")]
    UnknownBin { tad: String, bin: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
