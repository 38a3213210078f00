use bevy::prelude::*;
use crossbeam_channel::{unbounded, Receiver, TryRecvError};
use std::{
    io::{BufRead, BufReader, Write},
    net::TcpStream,
    sync::{Arc, Mutex},
    thread,
};

use crate::server::{Response, ServerError, ServerSession};

/// Connection to the single gym client.
#[derive(Resource)]
pub struct ServerConnection {
    writer: Arc<Mutex<TcpStream>>,
    lines: Receiver<String>,
}

impl ServerConnection {
    /// Starts a reader thread that forwards every received line.
    pub fn spawn(stream: TcpStream) -> Result<Self, ServerError> {
        let reader = stream.try_clone()?;
        let (sender, lines) = unbounded();

        thread::spawn(move || {
            for line in BufReader::new(reader).lines() {
                match line {
                    Ok(line) if line.trim().is_empty() => continue,
                    Ok(line) => {
                        if sender.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read from client: {}", e);
                        break;
                    }
                }
            }
            info!("Client reader finished");
        });

        Ok(Self {
            writer: Arc::new(Mutex::new(stream)),
            lines,
        })
    }

    pub fn send(&self, response: &Response) -> Result<(), ServerError> {
        let payload = serde_json::to_string(response)? + "\n";
        let mut stream = self
            .writer
            .lock()
            .map_err(|_| ServerError::Protocol("connection lock poisoned".into()))?;
        stream.write_all(payload.as_bytes())?;
        stream.flush()?;
        Ok(())
    }
}

/// Serves the JSON-lines gym protocol inside a Bevy app.
///
/// Each update drains the lines received so far and answers them in order. The app exits
/// once the client closes the session or disconnects.
pub struct GymServerPlugin {
    connection: Mutex<Option<ServerConnection>>,
}

impl GymServerPlugin {
    pub fn new(stream: TcpStream) -> Result<Self, ServerError> {
        Ok(Self {
            connection: Mutex::new(Some(ServerConnection::spawn(stream)?)),
        })
    }
}

impl Plugin for GymServerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ServerSession>()
            .add_systems(Update, handle_commands);

        match self.connection.lock().map(|mut slot| slot.take()) {
            Ok(Some(connection)) => {
                app.insert_resource(connection);
            }
            _ => error!("GymServerPlugin has no client connection"),
        }
    }
}

fn handle_commands(
    connection: Option<Res<ServerConnection>>,
    mut session: ResMut<ServerSession>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(connection) = connection else {
        return;
    };

    loop {
        let line = match connection.lines.try_recv() {
            Ok(line) => line,
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                info!("Client disconnected");
                exit.send(AppExit::Success);
                break;
            }
        };

        debug!("Received: {}", line);
        let response = session.handle_line(&line);
        if let Err(e) = connection.send(&response) {
            error!("Failed to send response: {}", e);
            exit.send(AppExit::error());
            break;
        }

        if session.is_closed() {
            exit.send(AppExit::Success);
            break;
        }
    }
}
