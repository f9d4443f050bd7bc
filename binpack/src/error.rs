use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("A rectangle of size {size:?} does not fit in a bin of size {bin_size:?} (occupancy {occupancy:.3})")]
    CapacityExceeded {
        /// The size that was requested, without padding.
        size: (u32, u32),

        /// The size of the bin at the moment packing gave up.
        bin_size: (u32, u32),

        /// The fraction of the bin that was occupied at that moment.
        occupancy: f32,
    },
}

impl PackError {
    pub(crate) fn invalid_argument<S: Into<String>>(message: S) -> Self {
        PackError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Tells whether this error came from running out of room in a bin, rather
    /// than from bad input.
    pub fn is_capacity_exceeded(&self) -> bool {
        match self {
            PackError::CapacityExceeded { .. } => true,
            _ => false,
        }
    }
}
