use parking_lot::Mutex;

use crate::SnowflakeId;

/// The generator's mutable state: the last issued ID, which carries both the
/// last timestamp and the current sequence.
#[cfg(feature = "cache-padded")]
pub(crate) type State = crossbeam_utils::CachePadded<Mutex<SnowflakeId>>;
#[cfg(not(feature = "cache-padded"))]
pub(crate) type State = Mutex<SnowflakeId>;

pub(crate) fn new_state(id: SnowflakeId) -> State {
    #[cfg(feature = "cache-padded")]
    {
        crossbeam_utils::CachePadded::new(Mutex::new(id))
    }
    #[cfg(not(feature = "cache-padded"))]
    {
        Mutex::new(id)
    }
}
