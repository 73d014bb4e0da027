//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the tracker hardware.
//! All pin mappings, timer rates, framing parameters and the station
//! profile are centralized here.

use crate::serial::OverflowPolicy;

/// System clock frequency (STM32G474 @ 170MHz)
pub const SYSTEM_CLOCK_HZ: u32 = 170_000_000;

/// GPS serial link baud rate (8 data bits, no parity, 1 stop bit)
pub const GPS_BAUD: u32 = 4800;

/// Capacity of each serial ring buffer (one slot stays free)
pub const SERIAL_BUFFER_SIZE: usize = 96;

/// What the receive ring does when the foreground falls behind
pub const RX_OVERFLOW_POLICY: OverflowPolicy = OverflowPolicy::DropNewest;

/// Bit clock timebase (170 MHz / 85)
pub const TIMER_TICK_HZ: u32 = 2_000_000;

/// Bit clock prescaler producing [`TIMER_TICK_HZ`]
pub const TIMER_PRESCALER: u16 = (SYSTEM_CLOCK_HZ / TIMER_TICK_HZ - 1) as u16;

/// AX.25 bit rate
pub const BAUD_RATE: u32 = 1200;

/// Bell-202 mark tone (binary one, no transition)
pub const MARK_HZ: u32 = 1200;

/// Bell-202 space tone
pub const SPACE_HZ: u32 = 2200;

/// Samples per tone cycle in the waveform table
pub const WAVEFORM_STEPS: u32 = 16;

/// Timer ticks per transmitted bit
pub const BIT_TICKS: u16 = div_round(TIMER_TICK_HZ, BAUD_RATE);

/// Timer reload between waveform samples for the mark tone
pub const MARK_PERIOD_TICKS: u16 = div_round(TIMER_TICK_HZ, MARK_HZ * WAVEFORM_STEPS);

/// Timer reload between waveform samples for the space tone
pub const SPACE_PERIOD_TICKS: u16 = div_round(TIMER_TICK_HZ, SPACE_HZ * WAVEFORM_STEPS);

/// Reload used while idle so the deadline interrupt fires rarely
pub const IDLE_TIMEOUT_TICKS: u16 = u16::MAX;

/// Flags sent ahead of the address field (TX delay, ~6.7ms each)
pub const TX_DELAY_FLAGS: u8 = 100;

/// APRS primary symbol table identifier
pub const SYMBOL_TABLE: u8 = b'/';

/// APRS symbol code (balloon)
pub const SYMBOL_CODE: u8 = b'O';

/// Ticks per idle wait between beacons (25 ms)
pub const BEACON_PAUSE_TICKS: u16 = 50_000;

/// Idle waits between beacons (about one minute)
pub const BEACON_PAUSE_WAITS: u16 = 2_400;

/// Beacon rotation as one-letter commands: `P` position, `T` telemetry,
/// `S` operator text
pub const BEACON_ROTATION: &[u8] = b"PPPTPS";

/// Independent watchdog timeout in microseconds
pub const WATCHDOG_TIMEOUT_US: u32 = 2_000_000;

/// Capacity of the canned text resource
pub const TEXT_CAPACITY: usize = 128;

/// Station profile stored in the canned text resource
pub mod station {
    //! Addresses and operator text burned into the text resource

    /// Destination address (tocall)
    pub const DESTINATION: &str = "APAVR0";

    /// Source address
    pub const SOURCE: &str = "NOCALL-11";

    /// Digipeater path for the full header
    pub const PATH: [&str; 2] = ["RELAY", "WIDE2-2"];

    /// Operator status text
    pub const OPERATOR_MESSAGE: &str = ">Tiny Transmitter APRS beacon";
}

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Indicator LED
    pub const LED: &str = "PB0";

    /// Push-to-talk gate
    pub const PTT: &str = "PB1";

    /// Ladder DAC bit 0 (8.2k)
    pub const DAC_BIT0: &str = "PB2";

    /// Ladder DAC bit 1 (3.9k)
    pub const DAC_BIT1: &str = "PB3";

    /// Ladder DAC bit 2 (2k)
    pub const DAC_BIT2: &str = "PB4";

    /// Ladder DAC bit 3 (1k)
    pub const DAC_BIT3: &str = "PB5";

    /// First ladder bit position on the port
    pub const DAC_SHIFT: usize = 2;

    /// GPS UART TX (USART1)
    pub const GPS_TX: &str = "PA9";

    /// GPS UART RX (USART1)
    pub const GPS_RX: &str = "PA10";

    /// Digital telemetry inputs, reported as bits 1 through 6
    pub const DIGITAL_INPUTS: [&str; 6] = ["PC1", "PC2", "PC3", "PC4", "PC5", "PC6"];

    /// Analog telemetry inputs, channels 0 through 5
    pub const ANALOG_INPUTS: [&str; 6] = ["PA0", "PA1", "PA2", "PA3", "PB14", "PC0"];
}

/// Timer assignments
pub mod timers {
    //! Hardware timer assignments

    /// Bit clock and tone oscillator (32-bit general purpose)
    pub const BIT_CLOCK: u8 = 2;

    /// embassy-time driver
    pub const TIME_DRIVER: u8 = 4;
}

/// Integer division rounded to nearest, for deriving timer reloads
#[must_use]
pub const fn div_round(num: u32, den: u32) -> u16 {
    ((num + den / 2) / den) as u16
}
