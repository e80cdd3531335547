use eframe::egui::ViewportBuilder;
use relog_core::{DOT_RELOG_LOGS_DIR, RELOG_NAME};
use tracing::Level;
use tracing_subscriber::{
    fmt::{writer::MakeWriterExt, Layer},
    prelude::*,
};

pub mod app;
pub mod channel;
pub mod errors_pool;
pub mod toasts;
pub mod views;

fn main() {
    let appender = tracing_appender::rolling::hourly(DOT_RELOG_LOGS_DIR, "relog.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(appender);

    let mut file_sub = Layer::new()
        .with_writer(non_blocking.with_max_level(Level::INFO))
        .compact();
    file_sub.set_ansi(false);

    let stdout_sub = Layer::new()
        .with_writer(std::io::stdout.with_max_level(Level::INFO))
        .pretty();

    let subscriber = tracing_subscriber::registry().with(stdout_sub).with(file_sub);

    tracing::subscriber::set_global_default(subscriber).unwrap();

    let runtime = tokio::runtime::Runtime::new().expect("Unable to create Runtime");
    let handle = runtime.handle().clone();

    // The runtime gets parked on its own thread. The GUI thread stays
    // out of the runtime context so it may `block_on` short file
    // operations through the handle.
    std::thread::spawn(move || runtime.block_on(std::future::pending::<()>()));

    let _ = eframe::run_native(
        RELOG_NAME,
        eframe::NativeOptions {
            viewport: ViewportBuilder::default()
                .with_inner_size([600.0, 600.0])
                .with_resizable(false),
            ..Default::default()
        },
        Box::new(|_cc| Ok(Box::new(app::App::new(handle)))),
    );
}
