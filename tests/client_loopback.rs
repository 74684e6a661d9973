//! End-to-end tests of the Tokio driver against a scripted server on a
//! loopback socket.

#![cfg(feature = "tokio")]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use slirc_client::{Client, Commands, ConnectionOptions, Event, EventKind};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing_subscriber::EnvFilter;

const LIMIT: Duration = Duration::from_secs(10);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn options(port: u16) -> ConnectionOptions {
    ConnectionOptions::new()
        .host("127.0.0.1")
        .port(port)
        .nick("ferris")
        .user("crab")
        .real_name("Ferris")
}

/// Accept one client, write `script`, then collect what the client sends
/// until `stop` matches a line or the client hangs up.
async fn serve(
    script: &'static str,
    stop: fn(&str) -> bool,
) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read, mut write) = stream.into_split();
        write.write_all(script.as_bytes()).await.unwrap();

        let mut lines = BufReader::new(read).lines();
        let mut received = Vec::new();
        while let Ok(Some(line)) = lines.next_line().await {
            let done = stop(&line);
            received.push(line);
            if done {
                break;
            }
        }
        received
    });
    (port, server)
}

fn record(client: &mut Client, kinds: Vec<EventKind>) -> Arc<Mutex<Vec<String>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    for kind in kinds {
        let log = Arc::clone(&log);
        client.on(kind, move |event, _| {
            log.lock().unwrap().push(event.kind().to_string());
        });
    }
    log
}

#[tokio::test]
async fn registers_answers_ping_and_quits() {
    init_tracing();
    let (port, server) = serve(
        ":srv CAP * LS :multi-prefix\r\n\
         :srv CAP * ACK :multi-prefix\r\n\
         :srv 001 ferris :Welcome\r\n\
         PING :tok\r\n\
         :friend!f@host PRIVMSG ferris :!quit\r\n",
        |_| false,
    )
    .await;

    let mut client = Client::new(options(port).build().unwrap());
    client.on(EventKind::Register, |_, ctx| ctx.join("#rust"));
    client.on(EventKind::named("privmsg"), |event, ctx| {
        if let Event::Message { message, .. } = event {
            if message.param(1) == Some("!quit") {
                ctx.quit(Some("bye now"));
                ctx.close();
            }
        }
    });
    let log = record(&mut client, vec![EventKind::Connect, EventKind::Close]);

    timeout(LIMIT, client.run()).await.expect("client stops");
    let received = timeout(LIMIT, server).await.unwrap().unwrap();

    assert_eq!(
        received,
        vec![
            "CAP LS",
            "NICK ferris",
            "USER crab 8 * Ferris",
            "CAP REQ multi-prefix",
            "CAP END",
            "JOIN #rust",
            "PONG tok",
            "QUIT :bye now",
        ]
    );
    assert_eq!(*log.lock().unwrap(), vec!["connect", "close"]);
    assert!(client.session().capabilities().is_empty());
}

#[tokio::test]
async fn refused_connection_reports_error_then_close() {
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let mut client = Client::new(options(port).build().unwrap());
    let log = record(
        &mut client,
        vec![EventKind::Connect, EventKind::Error, EventKind::Close],
    );

    timeout(LIMIT, client.run()).await.expect("client stops");
    assert_eq!(*log.lock().unwrap(), vec!["error", "close"]);
}

#[tokio::test]
async fn handle_sends_and_closes() {
    init_tracing();
    let (port, server) = serve("", |_| false).await;

    let mut client = Client::new(options(port).build().unwrap());
    let mut handle = client.handle();
    handle.privmsg("#rust", "hello from elsewhere");
    handle.close();

    timeout(LIMIT, client.run()).await.expect("client stops");
    let received = timeout(LIMIT, server).await.unwrap().unwrap();

    // Queued commands are delivered in order once the connection is up.
    assert_eq!(
        received,
        vec![
            "CAP LS",
            "NICK ferris",
            "USER crab 8 * Ferris",
            "PRIVMSG #rust :hello from elsewhere",
        ]
    );
}

#[tokio::test]
async fn idle_link_is_probed() {
    init_tracing();
    let (port, server) = serve(":srv 001 ferris :Welcome\r\n", |line| {
        line.starts_with("PING ")
    })
    .await;

    let config = options(port)
        .idle_timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let mut client = Client::new(config);
    let log = record(&mut client, vec![EventKind::Close]);

    // The server hangs up right after the probe.
    timeout(LIMIT, client.run()).await.expect("client stops");
    let received = timeout(LIMIT, server).await.unwrap().unwrap();

    let ping = received.last().expect("a probe was sent");
    let token = ping.trim_start_matches("PING ");
    assert!(token.parse::<i64>().is_ok(), "unexpected probe {:?}", ping);
    assert_eq!(*log.lock().unwrap(), vec!["close"]);
}

/// Run a registered client for a while with the given idle timeout and
/// return everything the server saw.
async fn run_quietly(idle: Duration) -> Vec<String> {
    let (port, server) = serve(":srv 001 ferris :Welcome\r\n", |_| false).await;

    let config = options(port).idle_timeout(idle).build().unwrap();
    let mut client = Client::new(config);
    let handle = client.handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        handle.close();
    });

    timeout(LIMIT, client.run()).await.expect("client stops");
    timeout(LIMIT, server).await.unwrap().unwrap()
}

#[tokio::test]
async fn huge_idle_timeout_never_pings() {
    init_tracing();
    let received = run_quietly(Duration::MAX).await;

    assert_eq!(&received[..3], &["CAP LS", "NICK ferris", "USER crab 8 * Ferris"]);
    assert!(!received.iter().any(|line| line.starts_with("PING")));
}

#[tokio::test]
async fn zero_idle_timeout_disables_keepalive() {
    init_tracing();
    let received = run_quietly(Duration::ZERO).await;

    assert_eq!(&received[..3], &["CAP LS", "NICK ferris", "USER crab 8 * Ferris"]);
    assert!(!received.iter().any(|line| line.starts_with("PING")));
}
