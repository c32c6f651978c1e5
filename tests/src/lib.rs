//! Placeholder library target so `chaoschain-tests` is a normal workspace
//! member; all actual coverage lives under `tests/`.
