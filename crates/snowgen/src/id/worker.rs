use core::fmt;

use crate::{Error, Result, SnowflakeId};

/// Identifier of one generator among all generators whose IDs must not
/// collide. Always within `0..=1023`.
///
/// Assigning distinct worker IDs is the deployment's job; this type only
/// guarantees the value fits its 10-bit field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId(u16);

impl WorkerId {
    /// Largest valid worker ID.
    #[allow(clippy::cast_possible_truncation)]
    pub const MAX: u16 = SnowflakeId::WORKER_ID_MASK as u16;

    /// Validates `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkerId`] if `id > 1023`.
    pub const fn new(id: u16) -> Result<Self> {
        if id > Self::MAX {
            return Err(Error::InvalidWorkerId { value: id as i128 });
        }
        Ok(Self(id))
    }

    /// Returns the raw value.
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<WorkerId> for u64 {
    fn from(id: WorkerId) -> Self {
        u64::from(id.0)
    }
}

macro_rules! impl_try_from_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TryFrom<$ty> for WorkerId {
                type Error = Error;

                fn try_from(value: $ty) -> Result<Self> {
                    let invalid = || Error::InvalidWorkerId {
                        value: value as i128,
                    };
                    let id = u16::try_from(value).map_err(|_| invalid())?;
                    Self::new(id)
                }
            }
        )*
    };
}

impl_try_from_int!(i8, i16, i32, i64, isize, u8, u32, u64, usize);

impl TryFrom<u16> for WorkerId {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(WorkerId::try_from(0_i64).unwrap().get(), 0);
        assert_eq!(WorkerId::try_from(1023_i64).unwrap().get(), 1023);
        assert_eq!(WorkerId::new(WorkerId::MAX).unwrap().get(), 1023);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            WorkerId::try_from(-1_i64),
            Err(Error::InvalidWorkerId { value: -1 })
        );
        assert_eq!(
            WorkerId::try_from(1024_i32),
            Err(Error::InvalidWorkerId { value: 1024 })
        );
        assert_eq!(
            WorkerId::try_from(u64::MAX),
            Err(Error::InvalidWorkerId {
                value: i128::from(u64::MAX)
            })
        );
        assert_eq!(
            WorkerId::new(1024),
            Err(Error::InvalidWorkerId { value: 1024 })
        );
    }

    #[test]
    fn error_message_names_the_range() {
        let err = WorkerId::try_from(-1_i64).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid worker ID -1: must be between 0 and 1023"
        );
    }
}
