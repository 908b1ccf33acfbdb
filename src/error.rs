use thiserror::Error;

#[derive(Error, Debug)]
pub enum MagGridError {
    /// The array shape does not match any Driscoll and Healy layout.
    #[error(
        "invalid grid shape ({nlat}, {nlon}): expected n x n, n x 2n, \
         (n+1) x (n+1) or (n+1) x (2n+1) with n even"
    )]
    InvalidGridShape { nlat: usize, nlon: usize },

    /// An unrecognized colorbar orientation was requested.
    #[error("colorbar must be either 'horizontal' or 'vertical'. Input value is '{0}'.")]
    InvalidColorbar(String),

    /// The plotting backend failed; the message is passed through unchanged.
    #[error("plot rendering failed: {0}")]
    Plot(String),
}
