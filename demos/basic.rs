#[cfg(windows)]
fn main() {
    use std::io::{self, BufRead};

    use libdesknav::{Config, DeskNavInstance, WinEventKind};
    use libdesknav::win::{WatchOptions, window};

    let mut state = match DeskNavInstance::new(Config::from_env()) {
        Ok(state) => state,
        Err(e) => {
            println!("Failed to initialize: {}", e);
            return;
        }
    };
    println!("Initialized DeskNavInstance");

    let navigator = state.navigator();
    println!(
        "Desktops: {}, current: {:?}",
        navigator.desktop_count(),
        navigator.current_desktop_index()
    );

    match state.monitors() {
        Ok(monitors) => {
            for mon in monitors.iter() {
                println!("Monitor {} ({}): {:?}, primary: {}", mon.index, mon.device_name, mon.bounds, mon.primary);
            }
        }
        Err(e) => println!("Failed to enumerate monitors: {}", e),
    }

    let foreground = window::foreground_window();
    println!(
        "Foreground window {} on current desktop: {}",
        foreground,
        navigator.is_window_on_current_desktop(foreground)
    );

    let options = WatchOptions {
        range: libdesknav::EventRange::single(WinEventKind::Foreground),
        ..WatchOptions::default()
    };
    let callback = |event: &libdesknav::WinEvent| {
        println!("Foreground changed to {} ({})", event.window, window::text(event.window));
    };

    if state.watch_window_events(options, callback) {
        println!("Watching foreground changes.");
    } else {
        println!("Failed to start watching.");
        return;
    }

    println!("Moving the foreground window to the next desktop and following it...");
    println!("  {:?}", state.navigator().reassign(foreground, libdesknav::DesktopTarget::Next, true));
    println!("  {:?}", state.navigator().switch(libdesknav::DesktopTarget::Next, true));

    println!("Press Enter to stop watching...");
    let stdin = io::stdin();
    let _ = stdin.lock().lines().next();

    if state.stop_watch_window_events() {
        println!("Stopped watching.");
    } else {
        println!("Failed to stop watching.");
    }

    state.deinit();
    println!("Deinitialized DeskNavInstance");
}

#[cfg(not(windows))]
fn main() {
    println!("libdesknav drives the Windows shell; this demo only runs on Windows.");
}
