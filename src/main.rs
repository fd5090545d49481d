//! Tile Chase entry point
//!
//! Native builds run a headless demo: the playlist plays itself (the
//! autopilot only flips switches) and the final render snapshot is printed
//! as JSON. Web builds start from `platform::web`.
//!
//! Usage: `tile-chase [playlist.json] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;

    use tile_chase::platform::Button;
    use tile_chase::sim::{Phase, playlist_from_json};
    use tile_chase::{Session, SimError, Tuning};

    /// Frame interval of a 60 Hz display
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Forty seconds of frames
    const DEMO_FRAMES: u32 = 2400;

    /// Two small rooms: a door splits the seeker's corridor, the actor
    /// starts on the switch below it
    const DEMO_PLAYLIST: &str = r#"[
        {
            "name": "first-steps",
            "width": 7,
            "tiles": [
                1, 1, 1, 1, 1, 1, 1,
                1, 0, 0, 0, 0, 0, 1,
                1, 3, 1, 1, 1, 1, 1,
                1, 0, 0, 0, 0, 0, 1,
                1, 1, 1, 1, 1, 1, 1
            ],
            "objects": [
                { "kind": "actor", "x": 64, "y": 96 },
                { "kind": "switch", "x": 64, "y": 96, "properties": { "controls": "gate" } },
                { "id": "gate", "kind": "door", "x": 96, "y": 32 },
                { "kind": "seeker", "x": 32, "y": 32 },
                {
                    "kind": "goal", "x": 160, "y": 32,
                    "properties": { "spawns_hazard_phase": true }
                },
                { "kind": "spawner", "x": 160, "y": 96 },
                { "kind": "destructible", "x": 128, "y": 96 }
            ]
        },
        {
            "name": "quiet-corridor",
            "width": 7,
            "tiles": [
                1, 1, 1, 1, 1, 1, 1,
                1, 0, 0, 0, 0, 0, 1,
                1, 3, 1, 1, 1, 1, 1,
                1, 0, 0, 0, 0, 0, 1,
                1, 1, 1, 1, 1, 1, 1
            ],
            "objects": [
                { "kind": "actor", "x": 64, "y": 96 },
                { "kind": "switch", "x": 64, "y": 96, "properties": { "controls": "gate" } },
                { "id": "gate", "kind": "door", "x": 96, "y": 32 },
                { "kind": "seeker", "x": 32, "y": 32 },
                { "kind": "goal", "x": 160, "y": 32 },
                { "kind": "prop", "x": 160, "y": 96, "sprite": "plant" }
            ]
        }
    ]"#;

    pub fn run() -> Result<(), SimError> {
        let mut args = std::env::args().skip(1);
        let playlist = match args.next() {
            Some(path) => {
                log::info!("Loading playlist from {}", path);
                playlist_from_json(&fs::read_to_string(path)?)?
            }
            None => playlist_from_json(DEMO_PLAYLIST)?,
        };
        let tuning = match args.next() {
            Some(path) => Tuning::from_json(&fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };

        let mut session = Session::new(&playlist, tuning)?;
        session.play();

        let mut seen: Option<(usize, Phase)> = None;
        let mut ticks = 0u64;
        for frame in 0..DEMO_FRAMES {
            let snapshot = session.snapshot();
            if snapshot.prompt.as_deref() == Some("Flip switch") {
                session.key_down(Button::Action);
            } else {
                session.key_up(Button::Action);
            }

            ticks += u64::from(session.frame(f64::from(frame) * FRAME_MS));

            let snapshot = session.snapshot();
            let now = (snapshot.level_index, snapshot.phase);
            if seen != Some(now) {
                log::info!(
                    "Frame {}: level {} `{}` is {} (score {})",
                    frame,
                    snapshot.level_index,
                    snapshot.level_name,
                    snapshot.phase.as_str(),
                    snapshot.score
                );
                seen = Some(now);
            }
        }

        log::info!("Demo finished after {} ticks", ticks);
        println!("{}", session.snapshot().to_json()?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tile Chase (native) starting...");

    if let Err(err) = native::run() {
        log::error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
