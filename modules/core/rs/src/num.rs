use std::fmt::Debug;

/// T values are primitive integers
pub trait PrimInt: ::num::PrimInt + Debug + Default {}
impl<T: ::num::PrimInt + Debug + Default> PrimInt for T {}

/// T values are non-negative primitive integers
pub trait PrimUInt: PrimInt + ::num::Unsigned + ::num::CheckedAdd {}

impl<T: PrimInt + ::num::Unsigned + ::num::CheckedAdd> PrimUInt for T {}
