use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use rps_arena::Server;
use rps_arena::client::play;
use rps_arena::config::{ClientConfig, ServerConfig};
use rps_arena::error::CodecError;
use rps_arena::game::{Outcome, Selection};
use rps_arena::protocol::{DEFAULT_MAX_FRAME_BYTES, Message, MessageStream, write_frame};

const DONALD: &str = "donald";
const MICKEY: &str = "mickey";
const WAIT: Duration = Duration::from_secs(5);

type Player = MessageStream<TcpStream>;

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let config = ServerConfig {
            bind_address: "127.0.0.1".into(),
            port: 0,
            ..ServerConfig::default()
        };
        let server = Server::bind(config).await.unwrap();
        let addr = server.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.run(async {
            let _ = rx.await;
        }));
        Self {
            addr,
            shutdown: Some(tx),
            handle,
        }
    }

    async fn connect(&self) -> Player {
        let stream = TcpStream::connect(self.addr).await.unwrap();
        MessageStream::new(stream, DEFAULT_MAX_FRAME_BYTES)
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        timeout(WAIT, self.handle).await.unwrap().unwrap().unwrap();
    }
}

async fn recv(player: &mut Player) -> Result<Message, CodecError> {
    timeout(WAIT, player.recv()).await.expect("timed out waiting for message")
}

/// Joins two players in order and checks both received Start naming the other.
async fn matched_pair(server: &TestServer) -> (Player, Player) {
    let mut donald = server.connect().await;
    let mut mickey = server.connect().await;

    donald.send(&Message::join(DONALD)).await.unwrap();
    mickey.send(&Message::join(MICKEY)).await.unwrap();

    assert_eq!(recv(&mut donald).await.unwrap(), Message::start(MICKEY));
    assert_eq!(recv(&mut mickey).await.unwrap(), Message::start(DONALD));
    (donald, mickey)
}

async fn play_round(
    first: &mut Player,
    first_selection: Selection,
    second: &mut Player,
    second_selection: Selection,
) -> (Message, Message) {
    first.send(&Message::select(first_selection)).await.unwrap();
    second.send(&Message::select(second_selection)).await.unwrap();
    (recv(first).await.unwrap(), recv(second).await.unwrap())
}

#[tokio::test]
async fn test_single_round_win() {
    let server = TestServer::start().await;
    let (mut donald, mut mickey) = matched_pair(&server).await;

    let (to_donald, to_mickey) =
        play_round(&mut donald, Selection::Rock, &mut mickey, Selection::Paper).await;
    assert_eq!(to_donald, Message::result(Selection::Paper, Outcome::Lose));
    assert_eq!(to_mickey, Message::result(Selection::Rock, Outcome::Win));

    server.stop().await;
}

#[tokio::test]
async fn test_draws_then_decisive_round() {
    let server = TestServer::start().await;
    let (mut donald, mut mickey) = matched_pair(&server).await;

    for selection in [Selection::Rock, Selection::Paper] {
        let (to_donald, to_mickey) =
            play_round(&mut donald, selection, &mut mickey, selection).await;
        assert_eq!(to_donald, Message::result(selection, Outcome::Draw));
        assert_eq!(to_mickey, Message::result(selection, Outcome::Draw));
    }

    let (to_donald, to_mickey) =
        play_round(&mut donald, Selection::Scissors, &mut mickey, Selection::Rock).await;
    assert_eq!(to_donald, Message::result(Selection::Rock, Outcome::Lose));
    assert_eq!(to_mickey, Message::result(Selection::Scissors, Outcome::Win));

    server.stop().await;
}

#[tokio::test]
async fn test_disconnect_tears_down_session() {
    let server = TestServer::start().await;
    let (mut donald, mickey) = matched_pair(&server).await;

    drop(mickey);
    assert!(matches!(
        recv(&mut donald).await,
        Err(CodecError::ConnectionClosed)
    ));

    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_closes_connections_without_notice() {
    let server = TestServer::start().await;
    let (mut donald, mut mickey) = matched_pair(&server).await;

    server.stop().await;

    for player in [&mut donald, &mut mickey] {
        assert!(matches!(
            recv(player).await,
            Err(CodecError::ConnectionClosed)
        ));
    }
}

#[tokio::test]
async fn test_select_before_join_closes_without_reply() {
    let server = TestServer::start().await;
    let mut player = server.connect().await;

    player.send(&Message::select(Selection::Rock)).await.unwrap();
    assert!(matches!(
        recv(&mut player).await,
        Err(CodecError::ConnectionClosed)
    ));

    server.stop().await;
}

#[tokio::test]
async fn test_malformed_payload_closes_connection() {
    let server = TestServer::start().await;
    let mut player = server.connect().await;

    write_frame(player.get_mut(), br#"{"type":"JOIN","content":"non-json"}"#)
        .await
        .unwrap();
    assert!(recv(&mut player).await.is_err());

    server.stop().await;
}

#[tokio::test]
async fn test_two_sessions_run_concurrently() {
    let server = TestServer::start().await;
    let (mut p1, mut p2) = matched_pair(&server).await;
    let (mut p3, mut p4) = matched_pair(&server).await;

    p1.send(&Message::select(Selection::Rock)).await.unwrap();
    p2.send(&Message::select(Selection::Paper)).await.unwrap();
    p3.send(&Message::select(Selection::Rock)).await.unwrap();

    assert_eq!(
        recv(&mut p1).await.unwrap(),
        Message::result(Selection::Paper, Outcome::Lose)
    );
    assert_eq!(
        recv(&mut p2).await.unwrap(),
        Message::result(Selection::Rock, Outcome::Win)
    );

    p4.send(&Message::select(Selection::Paper)).await.unwrap();
    assert_eq!(
        recv(&mut p3).await.unwrap(),
        Message::result(Selection::Paper, Outcome::Lose)
    );
    assert_eq!(
        recv(&mut p4).await.unwrap(),
        Message::result(Selection::Rock, Outcome::Win)
    );

    server.stop().await;
}

#[tokio::test]
async fn test_unjoined_connection_is_never_paired() {
    let server = TestServer::start().await;
    let mut first = server.connect().await;
    first.send(&Message::join("first")).await.unwrap();

    // Connected without joining, so not eligible for pairing yet.
    let mut third = server.connect().await;
    let mut second = server.connect().await;
    second.send(&Message::join("second")).await.unwrap();
    assert_eq!(recv(&mut first).await.unwrap(), Message::start("second"));
    assert_eq!(recv(&mut second).await.unwrap(), Message::start("first"));

    third.send(&Message::join("third")).await.unwrap();
    let mut fourth = server.connect().await;
    fourth.send(&Message::join("fourth")).await.unwrap();
    assert_eq!(recv(&mut third).await.unwrap(), Message::start("fourth"));
    assert_eq!(recv(&mut fourth).await.unwrap(), Message::start("third"));

    server.stop().await;
}

#[tokio::test]
async fn test_client_state_machine_against_server() {
    let server = TestServer::start().await;
    let config_for = |name: &str| ClientConfig {
        host: server.addr.ip().to_string(),
        port: server.addr.port(),
        name: Some(name.to_string()),
        ..ClientConfig::default()
    };

    let donald_config = config_for(DONALD);
    let mickey_config = config_for(MICKEY);
    let donald = tokio::spawn(async move {
        play(&donald_config, BufReader::new(&b"r\ns\n"[..])).await
    });
    let mickey = tokio::spawn(async move {
        play(&mickey_config, BufReader::new(&b"r\np\n"[..])).await
    });

    let donald = timeout(WAIT, donald).await.unwrap().unwrap().unwrap();
    let mickey = timeout(WAIT, mickey).await.unwrap().unwrap().unwrap();

    assert_eq!(donald.opponent_name.as_deref(), Some(MICKEY));
    assert_eq!(mickey.opponent_name.as_deref(), Some(DONALD));
    assert_eq!(donald.rounds.len(), 2);
    assert_eq!(donald.final_outcome(), Some(Outcome::Win));
    assert_eq!(mickey.final_outcome(), Some(Outcome::Lose));

    server.stop().await;
}

#[tokio::test]
async fn test_client_fails_without_server() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = ClientConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        name: Some(DONALD.into()),
        ..ClientConfig::default()
    };
    assert!(play(&config, BufReader::new(&b""[..])).await.is_err());
}
