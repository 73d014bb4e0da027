//! GPS UART (USART1, 4800 8N1)
//!
//! The embassy blocking driver sets up pins, clocks and baud rate; after
//! that, reception and transmission are driven from the USART1 interrupt
//! straight through the registers into the serial rings.

use embassy_stm32::mode::Blocking;
use embassy_stm32::pac;
use embassy_stm32::peripherals::{PA10, PA9, USART1};
use embassy_stm32::usart::{Config, ConfigError, Uart};
use embassy_stm32::Peripheral;

use crate::config::GPS_BAUD;
use crate::serial::{SerialIsr, TxPrime};

/// Open USART1 for the GPS and enable the receive interrupt
pub fn open<'d>(
    usart: impl Peripheral<P = USART1> + 'd,
    rx: impl Peripheral<P = PA10> + 'd,
    tx: impl Peripheral<P = PA9> + 'd,
) -> Result<Uart<'d, Blocking>, ConfigError> {
    let mut config = Config::default();
    config.baudrate = GPS_BAUD;
    let uart = Uart::new_blocking(usart, rx, tx, config)?;
    pac::USART1.cr1().modify(|w| w.set_rxneie(true));
    info!("GPS UART at {} baud", GPS_BAUD);
    Ok(uart)
}

/// Transmit-empty interrupt control for [`SerialLink`](crate::serial::SerialLink)
#[derive(Clone, Copy, Default)]
pub struct GpsPort;

impl TxPrime for GpsPort {
    fn is_idle(&self) -> bool {
        !pac::USART1.cr1().read().txeie()
    }

    fn prime(&mut self) {
        critical_section::with(|_| {
            pac::USART1.cr1().modify(|w| w.set_txeie(true));
        });
    }
}

/// Body of the USART1 interrupt
pub fn on_interrupt<const N: usize>(isr: &mut SerialIsr<'_, N>) {
    let regs = pac::USART1;
    let status = regs.isr().read();

    if status.ore() {
        regs.icr().write(|w| w.set_ore(true));
    }

    if status.rxne() {
        let byte = regs.rdr().read().dr() as u8;
        // Losses are counted in the ring and reported from the foreground
        let _ = isr.on_receive(byte);
    }

    if status.txe() && regs.cr1().read().txeie() {
        match isr.on_transmit_ready() {
            Some(byte) => regs.tdr().write(|w| w.set_dr(u16::from(byte))),
            None => regs.cr1().modify(|w| w.set_txeie(false)),
        }
    }
}
