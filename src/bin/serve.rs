use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*};
use std::{env, net::TcpListener, time::Duration};

use sphere_flyer::server::GymServerPlugin;

const PORT_VAR: &str = "SPHERE_FLYER_PORT";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port: u16 = match env::var(PORT_VAR) {
        Ok(value) => value.parse()?,
        Err(_) => 0,
    };

    let listener = TcpListener::bind(("127.0.0.1", port))?;
    // Clients parse this line to find the server.
    println!("PORT={}", listener.local_addr()?.port());

    let (stream, address) = listener.accept()?;
    stream.set_nodelay(true)?;

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(1))),
    )
    .add_plugins(LogPlugin::default());
    info!("Client connected from {}", address);

    app.add_plugins(GymServerPlugin::new(stream)?);
    app.run();

    Ok(())
}
