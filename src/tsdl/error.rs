use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("identifier '{0}' is empty or cannot be escaped into a valid TSDL identifier")]
    InvalidIdentifier(String),

    #[error(
        "field '{field}' carries a clock-timestamp role but its stream class \
         has no default clock class name"
    )]
    InvalidFieldType { field: String },

    #[error("fragment sink failed to append a fragment")]
    IoAppend(#[from] std::io::Error),
}
