//! Tests for match dispatch, the TCP accept loop, and the terminal client.

use std::time::Duration;
use strictly_tictactoe_server::{
    Dispatcher, Endpoint, EndpointError, LineEndpoint, Mark, Outcome, TcpEndpoint, client, serve,
};
use tokio::io::{AsyncBufReadExt, BufReader, DuplexStream, Lines, duplex};
use tokio::net::{TcpListener, TcpStream};

type Pipe = LineEndpoint<DuplexStream>;

fn connection(name: &str) -> (Pipe, Pipe) {
    let (server, player) = duplex(64 * 1024);
    (
        LineEndpoint::new(server, format!("server->{name}")),
        LineEndpoint::new(player, name),
    )
}

async fn send_all<E: Endpoint>(player: &mut E, moves: &[&str]) {
    for mv in moves {
        player.send_line(mv).await.unwrap();
    }
}

async fn transcript<E: Endpoint>(player: &mut E) -> Vec<String> {
    let mut lines = Vec::new();
    loop {
        match player.recv_line().await {
            Ok(line) => lines.push(line),
            Err(EndpointError::Closed) => return lines,
            Err(err) => panic!("unexpected endpoint error: {err}"),
        }
    }
}

async fn start_server() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, Dispatcher::new()));
    addr
}

async fn connect(addr: std::net::SocketAddr) -> TcpEndpoint {
    TcpEndpoint::from_tcp(TcpStream::connect(addr).await.unwrap())
}

#[tokio::test]
async fn test_start_match_returns_report() {
    let dispatcher = Dispatcher::new();
    let (s0, mut p0) = connection("x");
    let (s1, mut p1) = connection("o");
    send_all(&mut p0, &["0 0", "0 1", "0 2"]).await;
    send_all(&mut p1, &["1 0", "1 1"]).await;

    let handle = dispatcher.start_match(s0, s1);
    let report = handle.await.unwrap();

    assert_eq!(report.outcome, Some(Outcome::Winner(Mark::X)));
    assert_eq!(report.match_id, 1);
    assert_eq!(dispatcher.matches_started(), 1);
    assert_eq!(dispatcher.active_matches(), 0);
}

#[tokio::test]
async fn test_stalled_match_does_not_block_others() {
    let dispatcher = Dispatcher::new();

    // Match A: X never moves.
    let (a0, mut a_x) = connection("a-x");
    let (a1, a_o) = connection("a-o");
    let stalled = dispatcher.start_match(a0, a1);

    // Match B: plays to a win.
    let (b0, mut b_x) = connection("b-x");
    let (b1, mut b_o) = connection("b-o");
    send_all(&mut b_x, &["1 1", "0 0", "2 2"]).await;
    send_all(&mut b_o, &["0 1", "0 2"]).await;
    let finished = dispatcher.start_match(b0, b1);

    let report = tokio::time::timeout(Duration::from_secs(5), finished)
        .await
        .expect("match B should finish while A is stalled")
        .unwrap();
    assert_eq!(report.outcome, Some(Outcome::Winner(Mark::X)));
    assert_eq!(report.match_id, 2);
    assert_eq!(dispatcher.active_matches(), 1);
    assert!(!stalled.is_finished());

    // X of match A is still waiting to be asked for a move.
    assert_eq!(a_x.recv_line().await.unwrap(), "You are player X");

    drop(a_o);
    drop(a_x);
    let report = stalled.await.unwrap();
    assert_eq!(report.outcome, None);
    assert_eq!(dispatcher.active_matches(), 0);
}

#[tokio::test]
async fn test_serve_pairs_connections_in_arrival_order() {
    let addr = start_server().await;

    let mut first = connect(addr).await;
    assert_eq!(
        first.recv_line().await.unwrap(),
        "Waiting for another player to connect..."
    );
    let mut second = connect(addr).await;

    assert_eq!(first.recv_line().await.unwrap(), "You are player X");
    assert_eq!(second.recv_line().await.unwrap(), "You are player O");

    send_all(&mut first, &["0 0", "0 1", "0 2"]).await;
    send_all(&mut second, &["1 0", "1 1"]).await;

    let x = transcript(&mut first).await;
    let o = transcript(&mut second).await;
    assert!(x.iter().any(|l| l == "YOU WON!"));
    assert!(o.iter().any(|l| l == "YOU LOST!"));
    assert_eq!(x.last().map(String::as_str), Some("Terminating connection..."));
    assert_eq!(o.last().map(String::as_str), Some("Terminating connection..."));
}

#[tokio::test]
async fn test_serve_runs_matches_independently() {
    let addr = start_server().await;

    let mut a_x = connect(addr).await;
    a_x.recv_line().await.unwrap();
    let mut a_o = connect(addr).await;

    let mut b_x = connect(addr).await;
    assert_eq!(
        b_x.recv_line().await.unwrap(),
        "Waiting for another player to connect..."
    );
    let mut b_o = connect(addr).await;

    // Match B finishes first even though A was paired earlier.
    send_all(&mut b_x, &["0 0", "1 1", "2 2"]).await;
    send_all(&mut b_o, &["0 1", "0 2"]).await;
    let b = transcript(&mut b_x).await;
    assert!(b.iter().any(|l| l == "YOU WON!"));
    drop(b_o);

    // Match A: O leaves mid-game, X is told.
    send_all(&mut a_x, &["2 2"]).await;
    drop(a_o);
    let a = transcript(&mut a_x).await;
    assert_eq!(
        a.last().map(String::as_str),
        Some("The other player has left! Terminating connection...")
    );
}

/// Runs the terminal client in the background; its output arrives line by line.
fn spawn_client(
    stream: TcpStream,
    moves: &'static [u8],
) -> (tokio::task::JoinHandle<()>, Lines<BufReader<DuplexStream>>) {
    let (screen, viewer) = duplex(64 * 1024);
    let handle = tokio::spawn(async move {
        client::play(stream, moves, screen).await.unwrap();
    });
    (handle, BufReader::new(viewer).lines())
}

async fn remaining(lines: &mut Lines<BufReader<DuplexStream>>) -> Vec<String> {
    let mut rest = Vec::new();
    while let Some(line) = lines.next_line().await.unwrap() {
        rest.push(line);
    }
    rest
}

#[tokio::test]
async fn test_clients_play_through_server() {
    let addr = start_server().await;

    let (x_task, mut x_screen) =
        spawn_client(TcpStream::connect(addr).await.unwrap(), b"0 0\n0 1\n0 2\n");
    // X is paired first only once the server has parked it.
    assert_eq!(
        x_screen.next_line().await.unwrap().as_deref(),
        Some("Waiting for another player to connect...")
    );

    let (o_task, mut o_screen) =
        spawn_client(TcpStream::connect(addr).await.unwrap(), b"1 0\n1 1\n");

    x_task.await.unwrap();
    o_task.await.unwrap();
    let x = remaining(&mut x_screen).await;
    let o = remaining(&mut o_screen).await;

    assert_eq!(x[0], "You are player X");
    assert_eq!(o[0], "You are player O");
    assert!(x.iter().any(|l| l == "YOU WON!"));
    assert!(o.iter().any(|l| l == "YOU LOST!"));
    assert_eq!(x[x.len() - 2..], ["Terminating connection...", "GAME ENDED!"]);
    assert_eq!(o[o.len() - 2..], ["Terminating connection...", "GAME ENDED!"]);
    assert_eq!(x.iter().filter(|l| *l == client::MOVE_PROMPT).count(), 3);
    assert!(!x.iter().any(|l| l == "Your turn to move!"));
}
