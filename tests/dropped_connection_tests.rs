use std::sync::Arc;

use std::time::Duration;

use battleship_server::prelude::*;
use battleship_server::Outbound;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Sink whose peer has gone away: every write fails.
struct BrokenSink;

#[async_trait::async_trait]
impl LineSink for BrokenSink {
    async fn send_line(&mut self, _line: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("Connection reset by peer"))
    }

    async fn shutdown(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

fn connect(coordinator: &Arc<GameCoordinator>) -> (InMemoryTransport, JoinHandle<anyhow::Result<()>>) {
    let (server_end, client_end) = InMemoryTransport::pair();
    let (source, sink) = server_end.into_split();
    let (session, outbound) = coordinator.admit().unwrap();
    tokio::spawn(session.clone().run_writer(coordinator.clone(), outbound, sink));
    (client_end, tokio::spawn(session.run(coordinator.clone(), source)))
}

async fn start_match(coordinator: &Arc<GameCoordinator>) -> anyhow::Result<[(InMemoryTransport, JoinHandle<anyhow::Result<()>>); 2]> {
    let mut p1 = connect(coordinator);
    let mut p2 = connect(coordinator);
    for (client, ships) in [(&mut p1.0, "SHIPS:0,0;1,0"), (&mut p2.0, "SHIPS:5,5;5,6")] {
        client.reader.recv_line().await?;
        client.writer.send_line(ships).await?;
        client.writer.send_line("READY").await?;
    }
    for client in [&mut p1.0, &mut p2.0] {
        assert_eq!(client.reader.recv_line().await?.as_deref(), Some("GAME_START"));
        assert_eq!(client.reader.recv_line().await?.as_deref(), Some("TURN:1"));
    }
    Ok([p1, p2])
}

#[tokio::test(flavor = "multi_thread")]
async fn test_opponent_drop_mid_game_forfeits() -> anyhow::Result<()> {
    let coordinator = Arc::new(GameCoordinator::new(GameConfig::default()));
    let [(mut c1, h1), (c2, h2)] = start_match(&coordinator).await?;

    c1.writer.send_line("SHOT:5,5").await?;
    assert_eq!(c1.reader.recv_line().await?.as_deref(), Some("SHOT_RESULT:5,5,HIT"));
    assert_eq!(c1.reader.recv_line().await?.as_deref(), Some("TURN:1"));

    // Simulate network failure on player 2.
    drop(c2);
    h2.await??;

    assert_eq!(c1.reader.recv_line().await?.as_deref(), Some("GAME_OVER:1"));
    assert_eq!(c1.reader.recv_line().await?, None);
    h1.await??;

    assert_eq!(coordinator.phase(), Phase::GameOver);
    assert_eq!(coordinator.winner(), Some(PlayerId::ONE));
    assert_eq!(coordinator.summary().shots_fired, [1, 0]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_active_player_drop_hands_win_to_waiting_player() -> anyhow::Result<()> {
    let coordinator = Arc::new(GameCoordinator::new(GameConfig::default()));
    let [(c1, h1), (mut c2, h2)] = start_match(&coordinator).await?;

    drop(c1);
    h1.await??;

    assert_eq!(c2.reader.recv_line().await?.as_deref(), Some("GAME_OVER:2"));
    assert_eq!(c2.reader.recv_line().await?, None);
    h2.await??;
    assert_eq!(coordinator.winner(), Some(PlayerId::TWO));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_writes_after_game_over_are_harmless() -> anyhow::Result<()> {
    let coordinator = Arc::new(GameCoordinator::new(GameConfig::default()));
    let [(mut c1, h1), (mut c2, h2)] = start_match(&coordinator).await?;

    c1.writer.send_line("SHOT:5,5").await?;
    c1.writer.send_line("SHOT:5,6").await?;
    let mut seen = Vec::new();
    while let Some(line) = c1.reader.recv_line().await? {
        seen.push(line);
    }
    assert_eq!(seen.last().map(String::as_str), Some("GAME_OVER:1"));

    // Player 2 keeps talking to a finished match; its lines go nowhere.
    let _ = c2.writer.send_line("SHOT:0,0").await;
    while c2.reader.recv_line().await?.is_some() {}

    h1.await??;
    h2.await??;
    assert_eq!(coordinator.winner(), Some(PlayerId::ONE));
    assert_eq!(coordinator.summary().shots_fired, [2, 0]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_write_failure_mid_game_forfeits() -> anyhow::Result<()> {
    let coordinator = Arc::new(GameCoordinator::new(GameConfig::default()));
    let (p1, rx1) = coordinator.admit()?;
    let (p2, mut rx2) = coordinator.admit()?;
    p1.handle_line(&coordinator, "SHIPS:0,0");
    p2.handle_line(&coordinator, "SHIPS:5,5");
    p1.handle_line(&coordinator, "READY");
    p2.handle_line(&coordinator, "READY");
    assert_eq!(coordinator.active_player(), Some(PlayerId::ONE));

    // Player 1's peer never sends anything, so only the failed write can end
    // its session.
    let (server_end, _client_end) = InMemoryTransport::pair();
    let (source, _) = server_end.into_split();
    let reader = tokio::spawn(p1.clone().run(coordinator.clone(), source));

    let err = p1
        .clone()
        .run_writer(coordinator.clone(), rx1, BrokenSink)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("reset"));

    timeout(Duration::from_secs(5), reader).await???;
    assert!(p1.is_closed());
    assert!(coordinator.session(PlayerId::ONE).is_none());
    assert_eq!(coordinator.phase(), Phase::GameOver);
    assert_eq!(coordinator.winner(), Some(PlayerId::TWO));

    let mut seen = Vec::new();
    while let Ok(item) = rx2.try_recv() {
        seen.push(item);
    }
    assert_eq!(
        seen,
        [
            Outbound::Message(ServerMessage::GameStart),
            Outbound::Message(ServerMessage::Turn(PlayerId::ONE)),
            Outbound::Message(ServerMessage::GameOver(Some(PlayerId::TWO))),
            Outbound::Close,
        ]
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_write_failure_during_placement_frees_slot() -> anyhow::Result<()> {
    let coordinator = Arc::new(GameCoordinator::new(GameConfig::with_board_size(6)));
    assert_eq!(coordinator.config().board_size, 6);
    let (p1, rx1) = coordinator.admit()?;
    p1.send(ServerMessage::PlayerId(p1.player_id()));

    assert!(p1.clone().run_writer(coordinator.clone(), rx1, BrokenSink).await.is_err());

    assert!(p1.is_closed());
    assert!(coordinator.session(PlayerId::ONE).is_none());
    assert_eq!(coordinator.phase(), Phase::WaitingForPlayers);
    assert_eq!(coordinator.winner(), None);
    Ok(())
}
