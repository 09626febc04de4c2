//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements              | Connects to                 |
//! |------------|-------------------------|-----------------------------|
//! | `console`  | CommandPort             | UART console / stdin        |
//! | `hardware` | SensorPort, OutputPort  | ADC1, LEDC PWM, GPIO        |
//! | `log_sink` | EventSink               | Serial log output           |
//! | `time`     | ClockPort               | ESP32 system timer          |

pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod time;
