//! # Quickstart Example
//!
//! Minimal tour of can-common on the host:
//! - Synthesize acceptance filters and program them through a driver
//! - Register a mailbox callback, a general callback, and a listener
//! - Feed received frames through the dispatch path
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use can_common::core::CAN_BPS_500K;
use can_common::dispatch::{CanListener, Subscriptions};
use can_common::filter::Filter;
use can_common::frame::CanFrame;
use can_common::transceiver::{BusConfig, CanCommon, CanTransceiver, Reception, WatchFor};

/// Driver stand-in printing what it is asked to do.
struct PrintingTransceiver {
    next_mailbox: usize,
}

impl CanTransceiver for PrintingTransceiver {
    type Error = &'static str;

    fn init(&mut self, baud_rate: u32) -> Result<u32, Self::Error> {
        println!("   init @ {} bit/s", baud_rate);
        Ok(baud_rate)
    }

    fn set_filter(&mut self, filter: Filter) -> Result<usize, Self::Error> {
        let mailbox = self.next_mailbox;
        self.set_filter_specific(mailbox, filter)?;
        self.next_mailbox += 1;
        Ok(mailbox)
    }

    fn set_filter_specific(
        &mut self,
        mailbox: usize,
        filter: Filter,
    ) -> Result<usize, Self::Error> {
        if mailbox >= 8 {
            return Err("no free mailbox");
        }
        println!(
            "   mailbox {}: id {:#010x} mask {:#010x} {}",
            mailbox,
            filter.id,
            filter.mask,
            if filter.extended { "ext" } else { "std" }
        );
        Ok(mailbox)
    }

    fn begin_auto_speed(&mut self) -> Result<u32, Self::Error> {
        Err("auto speed not supported")
    }

    fn set_baudrate(&mut self, baud_rate: u32) -> Result<u32, Self::Error> {
        self.init(baud_rate)
    }

    fn set_listen_only_mode(&mut self, enabled: bool) {
        println!("   listen-only: {}", enabled);
    }

    fn enable(&mut self) {}

    fn disable(&mut self) {}

    fn send_frame(&mut self, _frame: &CanFrame) -> Result<(), Self::Error> {
        Ok(())
    }

    fn available(&self) -> usize {
        0
    }

    fn get_rx_buff(&mut self) -> Option<CanFrame> {
        None
    }
}

struct EngineListener {
    subs: Subscriptions,
}

impl CanListener for EngineListener {
    fn subscriptions(&self) -> &Subscriptions {
        &self.subs
    }

    fn got_frame(&self, frame: &CanFrame, mailbox: Option<usize>) {
        println!(
            "   listener: {:#05x} via {:?} payload {:02X?}",
            frame.id,
            mailbox,
            frame.payload()
        );
    }
}

fn main() {
    println!("=== can-common Quickstart ===\n");

    let on_rpm = |frame: &CanFrame| println!("   rpm callback: {:02X?}", frame.payload());
    let on_anything = |frame: &CanFrame| println!("   general callback: {:#x}", frame.id);
    let engine = EngineListener {
        subs: Subscriptions::new(),
    };

    let mut can: CanCommon<'_, PrintingTransceiver> =
        CanCommon::new(PrintingTransceiver { next_mailbox: 0 });

    // ======================================================================
    // 1. Bring the bus up
    // ======================================================================
    println!("1. Bus bring-up");
    let config = BusConfig::default().with_baud_rate(CAN_BPS_500K);
    if let Err(e) = can.begin_with_config(&config) {
        eprintln!("   init failed: {}", e);
        return;
    }
    println!("   bus speed: {}\n", can.bus_speed());

    // ======================================================================
    // 2. Program filters
    // ======================================================================
    println!("2. Filters");
    let driver = can.transceiver_mut();
    let rpm_mailbox = driver.watch_for(0x0C9).unwrap_or(0);
    let engine_mailbox = driver.watch_for_range(0x100, 0x10F).unwrap_or(1);
    // 0x0FF..=0x100 straddles a power-of-two boundary: the filter over-admits.
    let _ = driver.watch_for_range(0x0FF, 0x100);
    println!();

    // ======================================================================
    // 3. Register handlers
    // ======================================================================
    println!("3. Handlers");
    let registry = can.registry_mut();
    if registry.set_callback(rpm_mailbox, &on_rpm).is_err() {
        eprintln!("   mailbox {} out of range", rpm_mailbox);
    }
    registry.set_general_callback(&on_anything);
    match registry.attach(&engine) {
        Ok(slot) => println!("   engine listener in slot {}", slot),
        Err(e) => eprintln!("   attach failed: {}", e),
    }
    let _ = engine.subs.enable_mailbox(engine_mailbox);
    println!();

    // ======================================================================
    // 4. Simulated receive path
    // ======================================================================
    println!("4. Receive");
    let frames = [
        (CanFrame::with_data(0x0C9, false, &[0x12, 0x34]), rpm_mailbox),
        (CanFrame::with_data(0x104, false, &[0xAA]), engine_mailbox),
        (CanFrame::with_data(0x0FF, false, &[]), 2),
    ];
    for (frame, mailbox) in frames {
        let Some(frame) = frame else { continue };
        match can.on_receive(&frame, mailbox) {
            Reception::Delivered(n) => println!("   -> {} handler(s)\n", n),
            Reception::Unclaimed => println!("   -> unclaimed, driver would buffer it\n"),
        }
    }
}
