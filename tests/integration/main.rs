//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the controller against
//! mock adapters.  All tests run on the host with no real hardware
//! required.

mod day_cycle_tests;
mod keypad_tests;
mod mock_hw;
mod service_tests;
