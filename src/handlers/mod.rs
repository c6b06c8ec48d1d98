// Route handlers, split by security tier:
// public (no session) and protected (session required via middleware).
pub mod protected;
pub mod public;
