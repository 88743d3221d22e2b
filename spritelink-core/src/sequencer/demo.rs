//! Demo stages
//!
//! Each stage is a short, self-contained sequence of commands, timed
//! against the blanking edges the same way a real application would
//! time its updates.

use embedded_hal_async::delay::DelayNs;
use spritelink_hal::{ClockOutput, OutputPin, SpiBus};
use spritelink_protocol::color::{COLOR_GROUPS, DEFAULT_PALETTE};
use spritelink_protocol::geometry::{MAX_SPRITE_X, MAX_SPRITE_Y};
use spritelink_protocol::{sprites, Background, MiscFlags};

use super::orbit::{circle_point, Spiral};
use crate::config::LinkConfig;
use crate::link::{CommandLink, LinkError};
use crate::sync::{BlankingEdge, SyncGate};

/// Frames the split-frame stage runs for (five seconds at 60 Hz)
pub const DUAL_SPRITE_FRAMES: u32 = 300;

/// Line offsets walked by the offset sweep
pub const SWEEP_OFFSETS: [u32; 2] = [4, 11];

/// Lines after the frame edge where the split-frame stage moves the sprite
const DUAL_FIRST_LINE: u32 = 5;
const DUAL_SECOND_LINE_GAP: u32 = 30;
const DUAL_SECOND_Y: u8 = 32;

/// Margin of the circular path used by the offset sweep
const SWEEP_MARGIN: u8 = 10;
const SWEEP_STEP_DEG: usize = 4;

/// Passes and margin of the two-point stage
const MULTI_PASSES: u32 = 2;
const MULTI_MARGIN: u8 = 4;

/// Demo error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DemoError<E, C> {
    Link(LinkError<E>),
    Clock(C),
}

impl<E, C> From<LinkError<E>> for DemoError<E, C> {
    fn from(err: LinkError<E>) -> Self {
        DemoError::Link(err)
    }
}

/// Demo stages in running order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// Each background pattern with sprite movement on
    Backgrounds,
    /// Palette groups, then the default palette
    Palette,
    /// Every built-in sprite, loaded on a frame edge
    Gallery,
    /// Spiral orbit, one step per frame
    Spiral,
    /// Sprite moved twice per frame so it shows in two places
    DualSprite,
    /// Circular orbit with the update issued at different line offsets
    OffsetSweep,
    /// Reduced-clock mode and back
    ReducedClock,
    /// Sprite hopped between opposite points of a circle every window
    MultipleSprite,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Backgrounds,
        Stage::Palette,
        Stage::Gallery,
        Stage::Spiral,
        Stage::DualSprite,
        Stage::OffsetSweep,
        Stage::ReducedClock,
        Stage::MultipleSprite,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Backgrounds => "backgrounds",
            Stage::Palette => "palette",
            Stage::Gallery => "gallery",
            Stage::Spiral => "spiral",
            Stage::DualSprite => "dual sprite",
            Stage::OffsetSweep => "offset sweep",
            Stage::ReducedClock => "reduced clock",
            Stage::MultipleSprite => "multiple sprite",
        }
    }
}

/// Demo runner
pub struct Demo<'g, B, P, E, K, D> {
    link: CommandLink<B, P>,
    gate: &'g SyncGate<E>,
    clock: K,
    delay: D,
    config: LinkConfig,
    misc: MiscFlags,
}

impl<'g, B, P, E, K, D> Demo<'g, B, P, E, K, D>
where
    B: SpiBus,
    P: OutputPin,
    E: BlankingEdge,
    K: ClockOutput,
    D: DelayNs,
{
    pub fn new(
        link: CommandLink<B, P>,
        gate: &'g SyncGate<E>,
        clock: K,
        delay: D,
        config: LinkConfig,
    ) -> Self {
        Self {
            link,
            gate,
            clock,
            delay,
            config,
            misc: MiscFlags::new(),
        }
    }

    /// Last MISC value sent
    pub fn misc(&self) -> MiscFlags {
        self.misc
    }

    pub fn link(&self) -> &CommandLink<B, P> {
        &self.link
    }

    pub fn release(self) -> (CommandLink<B, P>, K, D) {
        (self.link, self.clock, self.delay)
    }

    /// Put the controller in a known state: full clock, default palette,
    /// first sprite centred and still
    pub async fn start(&mut self) -> Result<(), DemoError<B::Error, K::Error>> {
        self.clock
            .set_frequency(self.config.project.clock_hz)
            .map_err(DemoError::Clock)?;

        self.sync_window().await;
        self.set_misc(MiscFlags::new())?;
        self.link.set_palette(&DEFAULT_PALETTE)?;
        self.link.load_sprite(&sprites::TT)?;
        self.link
            .move_sprite((MAX_SPRITE_X / 2) as u8, (MAX_SPRITE_Y / 2) as u8)?;
        Ok(())
    }

    /// Run one stage to completion
    pub async fn run(&mut self, stage: Stage) -> Result<(), DemoError<B::Error, K::Error>> {
        match stage {
            Stage::Backgrounds => self.backgrounds().await?,
            Stage::Palette => self.palette().await?,
            Stage::Gallery => self.gallery().await?,
            Stage::Spiral => self.spiral().await?,
            Stage::DualSprite => self.dual_sprite().await?,
            Stage::OffsetSweep => self.offset_sweep().await?,
            Stage::ReducedClock => self.reduced_clock().await?,
            Stage::MultipleSprite => self.multiple_sprite().await?,
        }
        Ok(())
    }

    async fn sync_window(&self) {
        self.gate
            .sync_with_offset(self.config.sync.line_offset)
            .await;
    }

    async fn dwell(&mut self) {
        self.delay.delay_ms(self.config.demo.dwell_ms).await;
    }

    fn set_misc(&mut self, flags: MiscFlags) -> Result<(), LinkError<B::Error>> {
        self.link.set_misc(flags)?;
        self.misc = flags;
        Ok(())
    }

    async fn backgrounds(&mut self) -> Result<(), LinkError<B::Error>> {
        for background in Background::ALL {
            self.sync_window().await;
            self.set_misc(MiscFlags::new().with_background(background).with_movement(true))?;
            self.dwell().await;
        }
        Ok(())
    }

    async fn palette(&mut self) -> Result<(), LinkError<B::Error>> {
        for group in &COLOR_GROUPS {
            self.sync_window().await;
            self.link.set_palette(group)?;
            self.dwell().await;
        }

        self.sync_window().await;
        self.link.set_palette(&DEFAULT_PALETTE)?;
        // Solid background, movement off
        self.set_misc(MiscFlags::new())
    }

    async fn gallery(&mut self) -> Result<(), LinkError<B::Error>> {
        for sprite in &sprites::GALLERY {
            self.gate.sync_frame().await;
            self.link.load_sprite(sprite)?;
            self.dwell().await;
        }
        Ok(())
    }

    async fn spiral(&mut self) -> Result<(), LinkError<B::Error>> {
        let demo = self.config.demo;
        for (x, y) in Spiral::new(demo.orbit_rounds, demo.orbit_margin) {
            self.gate.sync_frame().await;
            self.link.move_sprite(x, y)?;
        }
        Ok(())
    }

    async fn dual_sprite(&mut self) -> Result<(), LinkError<B::Error>> {
        for _ in 0..DUAL_SPRITE_FRAMES {
            self.gate.sync_with_offset(DUAL_FIRST_LINE).await;
            self.link.set_y(0)?;

            self.gate.sync_lines(DUAL_SECOND_LINE_GAP).await;
            self.link.set_y(DUAL_SECOND_Y)?;
        }
        Ok(())
    }

    async fn offset_sweep(&mut self) -> Result<(), LinkError<B::Error>> {
        self.set_misc(MiscFlags::new())?;

        for offset in SWEEP_OFFSETS {
            for deg in (0..360).step_by(SWEEP_STEP_DEG) {
                let (x, y) = circle_point(deg, SWEEP_MARGIN);
                self.gate.sync_with_offset(offset).await;
                self.link.move_sprite(x, y)?;
            }
        }
        Ok(())
    }

    async fn multiple_sprite(&mut self) -> Result<(), LinkError<B::Error>> {
        for _ in 0..MULTI_PASSES {
            for deg in 0..360 {
                for index in 0..2 {
                    let (x, y) = circle_point(deg + 180 * index, MULTI_MARGIN);
                    self.sync_window().await;
                    self.link.move_sprite(x, y)?;
                }
            }
        }
        Ok(())
    }

    async fn reduced_clock(&mut self) -> Result<(), DemoError<B::Error, K::Error>> {
        let project = self.config.project;
        let base = MiscFlags::new().with_background(Background::Diagonal);

        // The controller must be told before its clock drops
        self.sync_window().await;
        self.set_misc(base.with_reduced_clock(true))?;
        self.clock
            .set_frequency(project.reduced_clock_hz)
            .map_err(DemoError::Clock)?;
        self.dwell().await;

        self.sync_window().await;
        self.set_misc(base)?;
        self.clock
            .set_frequency(project.clock_hz)
            .map_err(DemoError::Clock)?;
        self.dwell().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::Edge;
    use core::cell::RefCell;
    use embassy_futures::block_on;
    use std::vec;
    use std::vec::Vec;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Arm(Edge),
        Wait(Edge),
        Write(Vec<u8>),
        Clock(u32),
        Dwell(u32),
    }

    type Log = RefCell<Vec<Event>>;

    struct LogBus<'a>(&'a Log);

    impl SpiBus for LogBus<'_> {
        type Error = ();

        fn transfer(&mut self, _read: &mut [u8], write: &[u8]) -> Result<(), ()> {
            self.write(write)
        }

        fn write(&mut self, data: &[u8]) -> Result<(), ()> {
            self.0.borrow_mut().push(Event::Write(data.to_vec()));
            Ok(())
        }

        fn read(&mut self, _buf: &mut [u8]) -> Result<(), ()> {
            Ok(())
        }

        fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), ()> {
            self.write(&data.to_vec())
        }
    }

    struct NullPin;

    impl OutputPin for NullPin {
        fn set_high(&mut self) {}
        fn set_low(&mut self) {}
        fn is_set_high(&self) -> bool {
            true
        }
    }

    struct LogEdge<'a> {
        edge: Edge,
        log: &'a Log,
    }

    impl BlankingEdge for LogEdge<'_> {
        fn arm(&self) {
            self.log.borrow_mut().push(Event::Arm(self.edge));
        }

        async fn wait(&self) {
            self.log.borrow_mut().push(Event::Wait(self.edge));
        }

        fn wait_blocking(&self) {
            self.log.borrow_mut().push(Event::Wait(self.edge));
        }
    }

    struct LogClock<'a> {
        log: &'a Log,
        fail: bool,
    }

    impl ClockOutput for LogClock<'_> {
        type Error = u32;

        fn set_frequency(&mut self, hz: u32) -> Result<(), u32> {
            if self.fail {
                return Err(hz);
            }
            self.log.borrow_mut().push(Event::Clock(hz));
            Ok(())
        }

        fn stop(&mut self) {}
    }

    struct LogDelay<'a>(&'a Log);

    impl DelayNs for LogDelay<'_> {
        async fn delay_ns(&mut self, _ns: u32) {}

        async fn delay_ms(&mut self, ms: u32) {
            self.0.borrow_mut().push(Event::Dwell(ms));
        }
    }

    fn gate(log: &Log) -> SyncGate<LogEdge<'_>> {
        SyncGate::from_latches(
            LogEdge {
                edge: Edge::Frame,
                log,
            },
            LogEdge {
                edge: Edge::Line,
                log,
            },
        )
    }

    fn demo<'a>(
        log: &'a Log,
        gate: &'a SyncGate<LogEdge<'a>>,
    ) -> Demo<'a, LogBus<'a>, NullPin, LogEdge<'a>, LogClock<'a>, LogDelay<'a>> {
        Demo::new(
            CommandLink::new(LogBus(log), NullPin),
            gate,
            LogClock { log, fail: false },
            LogDelay(log),
            LinkConfig::default(),
        )
    }

    /// Events with every arm dropped, since each wait is always armed first
    fn waits_and_writes(log: &Log) -> Vec<Event> {
        log.borrow()
            .iter()
            .filter(|e| !matches!(e, Event::Arm(_)))
            .cloned()
            .collect()
    }

    fn line_waits(n: usize) -> impl Iterator<Item = Event> {
        core::iter::repeat(Event::Wait(Edge::Line)).take(n)
    }

    #[test]
    fn test_start_resets_controller() {
        let log = Log::default();
        let gate = gate(&log);
        let mut demo = demo(&log, &gate);
        block_on(demo.start()).unwrap();

        let events = waits_and_writes(&log);
        assert_eq!(events[0], Event::Clock(40_000_000));
        assert_eq!(events[1], Event::Wait(Edge::Frame));
        assert!(events[2..6].iter().all(|e| *e == Event::Wait(Edge::Line)));
        assert_eq!(events[6], Event::Write(vec![7]));
        assert_eq!(events[7], Event::Write(vec![0]));
        // misc + 4 colours + sprite + x + y
        assert_eq!(demo.link().commands_sent(), 8);
    }

    #[test]
    fn test_gallery_loads_on_frame_edges() {
        let log = Log::default();
        let gate = gate(&log);
        let mut demo = demo(&log, &gate);
        block_on(demo.run(Stage::Gallery)).unwrap();

        let events = waits_and_writes(&log);
        assert_eq!(events.len(), 4 * 4);
        for (chunk, sprite) in events.chunks(4).zip(sprites::GALLERY.iter()) {
            assert_eq!(chunk[0], Event::Wait(Edge::Frame));
            assert_eq!(chunk[1], Event::Write(vec![0]));
            assert_eq!(chunk[2], Event::Write(sprite.encode().as_bytes().to_vec()));
            assert_eq!(chunk[3], Event::Dwell(2000));
        }
    }

    #[test]
    fn test_dual_sprite_moves_twice_per_frame() {
        let log = Log::default();
        let gate = gate(&log);
        let mut demo = demo(&log, &gate);
        block_on(demo.run(Stage::DualSprite)).unwrap();

        let mut frame = Vec::new();
        frame.push(Event::Wait(Edge::Frame));
        frame.extend(line_waits(5));
        frame.push(Event::Write(vec![6]));
        frame.push(Event::Write(vec![0]));
        frame.extend(line_waits(30));
        frame.push(Event::Write(vec![6]));
        frame.push(Event::Write(vec![32]));

        let events = waits_and_writes(&log);
        assert_eq!(events.len(), frame.len() * DUAL_SPRITE_FRAMES as usize);
        for chunk in events.chunks(frame.len()) {
            assert_eq!(chunk, frame.as_slice());
        }
    }

    #[test]
    fn test_reduced_clock_orders_command_before_clock() {
        let log = Log::default();
        let gate = gate(&log);
        let mut demo = demo(&log, &gate);
        block_on(demo.run(Stage::ReducedClock)).unwrap();

        let events = waits_and_writes(&log);
        let reduced_misc = events
            .iter()
            .position(|e| *e == Event::Write(vec![0b1_0010]))
            .unwrap();
        let slow = events
            .iter()
            .position(|e| *e == Event::Clock(10_000_000))
            .unwrap();
        let normal_misc = events
            .iter()
            .position(|e| *e == Event::Write(vec![0b0_0010]))
            .unwrap();
        let fast = events
            .iter()
            .position(|e| *e == Event::Clock(40_000_000))
            .unwrap();
        assert!(reduced_misc < slow && slow < normal_misc && normal_misc < fast);
        assert!(!demo.misc().reduced_clock());
    }

    #[test]
    fn test_offset_sweep_uses_each_offset() {
        let log = Log::default();
        let gate = gate(&log);
        let mut demo = demo(&log, &gate);
        block_on(demo.run(Stage::OffsetSweep)).unwrap();

        let events = waits_and_writes(&log);
        let frames = events
            .iter()
            .filter(|e| **e == Event::Wait(Edge::Frame))
            .count();
        let lines = events
            .iter()
            .filter(|e| **e == Event::Wait(Edge::Line))
            .count();
        assert_eq!(frames, 2 * 90);
        assert_eq!(lines, 90 * (4 + 11));
    }

    #[test]
    fn test_multiple_sprite_alternates_opposite_points() {
        let log = Log::default();
        let gate = gate(&log);
        let mut demo = demo(&log, &gate);
        block_on(demo.run(Stage::MultipleSprite)).unwrap();

        assert_eq!(circle_point(0, MULTI_MARGIN), (84, 31));
        assert_eq!(circle_point(180, MULTI_MARGIN), (4, 31));

        let events = waits_and_writes(&log);
        // frame + 4 lines + x + y
        let step = 1 + 4 + 4;
        assert_eq!(events.len(), step * 2 * 360 * MULTI_PASSES as usize);
        for (i, chunk) in events.chunks(step).enumerate() {
            let deg = (i / 2 % 360) as i32 + 180 * (i % 2) as i32;
            let (x, y) = circle_point(deg, MULTI_MARGIN);
            assert_eq!(chunk[0], Event::Wait(Edge::Frame));
            assert!(chunk[1..5].iter().all(|e| *e == Event::Wait(Edge::Line)));
            assert_eq!(
                chunk[5..],
                [
                    Event::Write(vec![5]),
                    Event::Write(vec![x]),
                    Event::Write(vec![6]),
                    Event::Write(vec![y]),
                ]
            );
        }
        assert_eq!(demo.link().commands_sent(), 2 * 2 * 360 * MULTI_PASSES);
    }

    #[test]
    fn test_all_stages_run() {
        let log = Log::default();
        let gate = gate(&log);
        let mut demo = demo(&log, &gate);
        block_on(demo.start()).unwrap();
        for stage in Stage::ALL {
            block_on(demo.run(stage)).unwrap();
        }
        assert!(demo.link().commands_sent() > 1000);
        assert_eq!(demo.misc(), MiscFlags::new().with_background(Background::Diagonal));
    }

    #[test]
    fn test_clock_failure_surfaces() {
        let log = Log::default();
        let gate = gate(&log);
        let mut demo = Demo::new(
            CommandLink::new(LogBus(&log), NullPin),
            &gate,
            LogClock {
                log: &log,
                fail: true,
            },
            LogDelay(&log),
            LinkConfig::default(),
        );
        assert_eq!(block_on(demo.start()), Err(DemoError::Clock(40_000_000)));
        assert_eq!(
            block_on(demo.run(Stage::ReducedClock)),
            Err(DemoError::Clock(10_000_000))
        );
    }
}
