use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use sc_core::config::GaitConfig;
use sc_core::traits::PoseDetector;
use sc_session::protocol::{Response, dispatch};
use sc_session::session::GaitSession;

/// Intervalle de scrutation de l'accept non bloquant.
const ACCEPT_POLL: Duration = Duration::from_millis(50);
/// Read timeout on connections, so they notice shutdown.
const READ_POLL: Duration = Duration::from_millis(200);

/// Serveur TCP JSON-lines : un thread et une session par connexion.
pub struct Server {
    listener: TcpListener,
    config: Arc<ArcSwap<GaitConfig>>,
    detector: Arc<dyn PoseDetector>,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Binds the listener.
    ///
    /// # Errors
    /// Returns an error if the address cannot be bound.
    pub fn bind(
        addr: &str,
        config: Arc<ArcSwap<GaitConfig>>,
        detector: Arc<dyn PoseDetector>,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr).with_context(|| format!("binding {addr}"))?;
        listener
            .set_nonblocking(true)
            .context("listener non bloquant")?;
        log::info!(
            "Écoute sur {} (détecteur : {})",
            listener.local_addr()?,
            detector.name()
        );
        Ok(Self {
            listener,
            config,
            detector,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// # Errors
    /// Returns an error if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Flag that stops the accept loop and every connection when set.
    #[must_use]
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Accepte les connexions jusqu'à l'arrêt, puis attend les sessions.
    ///
    /// # Errors
    /// Returns an error if a connection thread cannot be spawned.
    pub fn run(self) -> Result<()> {
        let mut connections: Vec<JoinHandle<()>> = Vec::new();
        let mut next_id = 0u64;

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    next_id += 1;
                    let id = next_id;
                    // Snapshot: a later reload only affects new sessions.
                    let config = self.config.load_full();
                    let detector = Arc::clone(&self.detector);
                    let shutdown = Arc::clone(&self.shutdown);
                    let handle = std::thread::Builder::new()
                        .name(format!("session-{id}"))
                        .spawn(move || {
                            if let Err(e) =
                                serve_connection(stream, id, &config, detector.as_ref(), &shutdown)
                            {
                                log::error!("session {id} ({peer}) : {e:#}");
                            }
                        })
                        .context("spawning connection thread")?;
                    connections.push(handle);
                    connections.retain(|h| !h.is_finished());
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    std::thread::sleep(ACCEPT_POLL);
                }
                Err(e) => {
                    log::error!("accept : {e}");
                    std::thread::sleep(ACCEPT_POLL);
                }
            }
        }

        log::info!("Arrêt : attente de {} connexion(s)", connections.len());
        for handle in connections {
            if handle.join().is_err() {
                log::error!("connection thread panicked");
            }
        }
        Ok(())
    }
}

/// Reads request lines until EOF, shutdown or an oversized line.
///
/// Each line gets exactly one response line, in order.
fn serve_connection(
    stream: TcpStream,
    id: u64,
    config: &GaitConfig,
    detector: &dyn PoseDetector,
    shutdown: &AtomicBool,
) -> Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(READ_POLL))?;
    let peer = stream.peer_addr()?;
    let mut writer = BufWriter::new(stream.try_clone()?);
    let mut reader = BufReader::new(stream);

    let mut session = GaitSession::new(id, config);
    log::info!("session {id} : ouverte depuis {peer}");

    let max_line = config.server.max_line_bytes;
    let mut line: Vec<u8> = Vec::new();
    let result = loop {
        if shutdown.load(Ordering::Relaxed) {
            break Ok(());
        }
        let budget = (max_line + 1).saturating_sub(line.len()) as u64;
        match reader.by_ref().take(budget).read_until(b'\n', &mut line) {
            Ok(0) => break Ok(()),
            Ok(_) => {}
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                continue;
            }
            Err(e) => break Err(e.into()),
        }

        if line.last() != Some(&b'\n') {
            if line.len() > max_line {
                let reply = Response::error(format!("request line exceeds {max_line} bytes"));
                log::warn!("session {id} : ligne trop longue, connexion fermée");
                break send(&mut writer, &reply).map_err(Into::into);
            }
            continue;
        }

        let text = String::from_utf8_lossy(&line);
        let text = text.trim();
        if !text.is_empty() {
            let reply = dispatch(&mut session, text, |frame| detector.detect(frame));
            if let Err(e) = send(&mut writer, &reply) {
                break Err(e.into());
            }
        }
        line.clear();
    };

    session.close();
    result
}

fn send(writer: &mut impl Write, response: &Response) -> io::Result<()> {
    writer.write_all(response.to_line().as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()
}
