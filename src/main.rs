mod entity;
mod game;
mod render;
mod world;

use game::config::GameConfig;
use render::cell::TextCellGrid;
use render::view::View;
use world::plane::Plane;

fn main() {
    env_logger::init();

    let config = GameConfig::load();
    let args: Vec<String> = std::env::args().collect();
    let seed = args
        .get(1)
        .map(|s| s.parse().expect("seed must be an integer"))
        .unwrap_or(config.world.seed);
    let rooms = args
        .get(2)
        .map(|s| s.parse().expect("room count must be a positive integer"))
        .unwrap_or(config.world.rooms);

    let mut plane = Plane::generate(seed, rooms);
    if config.debug.dump_plane {
        log::debug!("{plane}");
    }

    let mut view = View::new(config.view.width, config.view.height, plane.starting_tile());

    // Optional third argument: a walk to take before the frame is drawn,
    // e.g. `warren 6 10 fflt` — forward, forward, left, turn.
    if let Some(walk) = args.get(3) {
        let graph = plane.graph_mut();
        for step in walk.chars() {
            match step {
                'f' => view.move_camera(graph, 0),
                'r' => view.move_camera(graph, 1),
                'b' => view.move_camera(graph, 2),
                'l' => view.move_camera(graph, 3),
                't' => view.turn(1),
                'T' => view.turn(-1),
                other => log::warn!("unknown walk step {other:?}"),
            }
        }
    }

    let (width, height) = view.size();
    let mut frame = TextCellGrid::new(width, height);
    let (graph, entities) = plane.view_parts();
    view.render(graph, entities, &mut frame);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    frame.write_ansi(&mut out).expect("failed to write frame");
}
