//! APRS Tracker Main Application
//!
//! Entry point for the STM32G474-based tracker firmware.
//! Sets up the GPS link, the bit clock and the radio, then beacons forever
//! from the foreground loop. USART1 and TIM2 are plain interrupt handlers.

#![no_std]
#![no_main]

use core::cell::RefCell;

use critical_section::Mutex;
use defmt::unwrap;
use embassy_executor::Spawner;
use embassy_stm32::adc::{Adc, AdcChannel};
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::InterruptExt;
use embassy_stm32::{pac, rcc};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use aprs_tracker::beacon::BeaconSettings;
use aprs_tracker::hal::adc::TelemetryInputs;
use aprs_tracker::hal::dac::GpioLadder;
use aprs_tracker::hal::gpio::{DigitalInputs, RadioGate};
use aprs_tracker::hal::timer::{BitTimer, Tim2Counter};
use aprs_tracker::hal::uart::{self, GpsPort};
use aprs_tracker::hal::watchdog::Iwdg;
use aprs_tracker::prelude::*;
use aprs_tracker::serial;

type Ring = SerialChannel<SERIAL_BUFFER_SIZE>;

/// Interrupt-side tone state
struct ToneState {
    oscillator: Oscillator<'static>,
    ladder: GpioLadder<'static>,
    counter: Tim2Counter,
}

static RX_RING: StaticCell<Ring> = StaticCell::new();
static TX_RING: StaticCell<Ring> = StaticCell::new();
static CLOCK: StaticCell<ClockShared> = StaticCell::new();
static TEXT: StaticCell<StaticText<TEXT_CAPACITY>> = StaticCell::new();

static GPS_ISR: Mutex<RefCell<Option<SerialIsr<'static, SERIAL_BUFFER_SIZE>>>> =
    Mutex::new(RefCell::new(None));
static TONE: Mutex<RefCell<Option<ToneState>>> = Mutex::new(RefCell::new(None));

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("APRS tracker firmware v{}", env!("CARGO_PKG_VERSION"));

    // HSI 16 MHz / 4 * 85 / 2 = 170 MHz
    let mut config = embassy_stm32::Config::default();
    config.rcc.pll = Some(rcc::Pll {
        source: rcc::PllSource::HSI,
        prediv: rcc::PllPreDiv::DIV4,
        mul: rcc::PllMul::MUL85,
        divp: None,
        divq: None,
        divr: Some(rcc::PllRDiv::DIV2),
    });
    config.rcc.sys = rcc::Sysclk::PLL1_R;
    config.rcc.boost = true;
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized at {} Hz", SYSTEM_CLOCK_HZ);

    // Canned header and operator text
    let (text, layout) = unwrap!(StaticText::station(
        station::DESTINATION,
        station::SOURCE,
        &station::PATH,
        station::OPERATOR_MESSAGE,
    ));
    let text: &'static StaticText<TEXT_CAPACITY> = TEXT.init(text);
    info!("station {} > {}, {} text bytes", station::SOURCE, station::DESTINATION, text.as_bytes().len());

    // GPS serial link
    let (link, gps_isr) = serial::split(
        RX_RING.init(Ring::new()),
        TX_RING.init(Ring::new()),
        GpsPort,
        RX_OVERFLOW_POLICY,
    );
    critical_section::with(|cs| GPS_ISR.borrow(cs).replace(Some(gps_isr)));
    let _uart = unwrap!(uart::open(p.USART1, p.PA10, p.PA9));

    // Bit clock and tone oscillator
    let bit_timer = BitTimer::new(p.TIM2);
    let counter = bit_timer.counter();
    let (clock, oscillator) = CLOCK.init(ClockShared::new()).split(counter);
    let ladder = GpioLadder::new(p.PB2, p.PB3, p.PB4, p.PB5);
    critical_section::with(|cs| {
        TONE.borrow(cs).replace(Some(ToneState {
            oscillator,
            ladder,
            counter,
        }))
    });

    interrupt::USART1.unpend();
    interrupt::TIM2.unpend();
    // SAFETY: both handlers only reach state installed above
    unsafe {
        interrupt::USART1.enable();
        interrupt::TIM2.enable();
    }

    // Radio keying and telemetry inputs
    let mut radio = RadioGate::new(
        Output::new(p.PB1, Level::Low, Speed::Low),
        Output::new(p.PB0, Level::Low, Speed::Low),
    );
    let digital = DigitalInputs::new([
        Input::new(p.PC1, Pull::Down),
        Input::new(p.PC2, Pull::Down),
        Input::new(p.PC3, Pull::Down),
        Input::new(p.PC4, Pull::Down),
        Input::new(p.PC5, Pull::Down),
        Input::new(p.PC6, Pull::Down),
    ]);
    let mut sensors = TelemetryInputs::new(
        Adc::new(p.ADC1),
        [
            p.PA0.degrade_adc(),
            p.PA1.degrade_adc(),
            p.PA2.degrade_adc(),
            p.PA3.degrade_adc(),
            p.PB14.degrade_adc(),
            p.PC0.degrade_adc(),
        ],
        digital,
    );

    let watchdog = Iwdg::start(p.IWDG);
    let mut gps = GpsInput::new(link, watchdog);
    gps.link().send_str("APRS tracker ready\r\n");

    let mut beacon = Beacon::new(clock, MessageComposer::new(0), text, BeaconSettings::new(layout.header));

    info!("Entering beacon loop");

    for &command in BEACON_ROTATION.iter().cycle() {
        beacon.pause(&mut gps);
        debug!("{} at {} ms", gps.decoder().stats(), Instant::now().as_millis());

        let message = Message::from_command(command, &layout);
        beacon.transmit(message, &mut gps, &mut radio, &mut sensors);
    }
}

#[interrupt]
fn USART1() {
    critical_section::with(|cs| {
        if let Some(isr) = GPS_ISR.borrow_ref_mut(cs).as_mut() {
            uart::on_interrupt(isr);
        }
    });
}

#[interrupt]
fn TIM2() {
    critical_section::with(|cs| {
        let mut tone = TONE.borrow_ref_mut(cs);
        match tone.as_mut() {
            Some(state) => {
                if state.counter.acknowledge() {
                    state.oscillator.on_overflow(&state.counter, &mut state.ladder);
                }
            }
            None => {
                pac::TIM2.sr().modify(|w| w.set_uif(false));
            }
        }
    });
}
