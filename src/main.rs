#[cfg(target_os = "macos")]
fn main() {
    use objc2::runtime::ProtocolObject;
    use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy, NSApplicationDelegate};
    use objc2_foundation::MainThreadMarker;

    init_logging();

    let Some(mtm) = MainThreadMarker::new() else {
        log::error!("quickshot must start on the main thread");
        std::process::exit(1);
    };

    let app = NSApplication::sharedApplication(mtm);
    app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);

    let config = quickshot::config::Config::load();
    let delegate = quickshot::app::AppDelegate::new(mtm, config);
    let delegate_proto: &ProtocolObject<dyn NSApplicationDelegate> =
        ProtocolObject::from_ref(&*delegate);
    app.setDelegate(Some(delegate_proto));

    app.run();
}

#[cfg(not(target_os = "macos"))]
fn main() {
    init_logging();
    log::error!("quickshot's overlays need macOS (AppKit); nothing to run on this platform");
    std::process::exit(1);
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
