use crate::runtime::value::Value;

/// One occupied heap slot: the value plus its mark bit.
///
/// The mark bit is false outside of a collection cycle; sweep resets it
/// for every survivor.
#[derive(Debug)]
pub(crate) struct HeapSlot {
    pub(crate) value: Value,
    pub(crate) marked: bool,
}
