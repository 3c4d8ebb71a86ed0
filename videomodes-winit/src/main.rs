use videomodes::Registry;
use videomodes_log::{error, info};
use videomodes_winit::WinitPlatform;

fn main() {
    videomodes_log::subscribe(videomodes_log::Log::default());

    let event_loop = winit::event_loop::EventLoop::new();
    let registry = match Registry::populate(&WinitPlatform::new(&*event_loop)) {
        Ok(registry) => registry,
        Err(err) => {
            error!("Could not enumerate video outputs: {}", err);
            std::process::exit(1);
        }
    };

    for (index, output) in registry.outputs().enumerate() {
        info!("{}: {}", index, output.name());
        for (mode_index, mode) in output.modes().enumerate() {
            let mark = if output.desktop_mode_index() == Some(mode_index) {
                "*"
            } else {
                " "
            };
            info!("  {} {}", mark, mode);
        }
    }
}
