use battleship_server::{ClientMessage, PlayerId, ProtocolError, ServerMessage, ShotOutcome};

#[test]
fn test_server_messages_render() {
    assert_eq!(ServerMessage::PlayerId(PlayerId(2)).to_string(), "PLAYER_ID:2");
    assert_eq!(ServerMessage::GameStart.to_string(), "GAME_START");
    assert_eq!(ServerMessage::Turn(PlayerId::ONE).to_string(), "TURN:1");
    assert_eq!(
        ServerMessage::ShotResult {
            x: 3,
            y: 4,
            outcome: ShotOutcome::AlreadyHit
        }
        .to_string(),
        "SHOT_RESULT:3,4,ALREADY_HIT"
    );
    assert_eq!(
        ServerMessage::OpponentShot {
            x: -1,
            y: 0,
            outcome: ShotOutcome::Invalid
        }
        .to_string(),
        "OPPONENT_SHOT:-1,0,INVALID"
    );
    assert_eq!(ServerMessage::GameOver(Some(PlayerId::TWO)).to_string(), "GAME_OVER:2");
    assert_eq!(ServerMessage::GameOver(None).to_string(), "GAME_OVER:0");
}

#[test]
fn test_server_message_parse() {
    assert_eq!(
        "SHOT_RESULT:5,5,GAME_OVER".parse::<ServerMessage>().unwrap(),
        ServerMessage::ShotResult {
            x: 5,
            y: 5,
            outcome: ShotOutcome::GameOver
        }
    );
    assert_eq!(
        "GAME_OVER:0\r".parse::<ServerMessage>().unwrap(),
        ServerMessage::GameOver(None)
    );
    assert!(matches!(
        "SHOT_RESULT:5,5,BOOM".parse::<ServerMessage>(),
        Err(ProtocolError::BadOutcome(_))
    ));
    assert!("HELLO".parse::<ServerMessage>().is_err());
}

#[test]
fn test_outcome_names() {
    for outcome in ShotOutcome::ALL {
        assert_eq!(outcome.to_string().parse::<ShotOutcome>(), Ok(outcome));
    }
    assert!("miss".parse::<ShotOutcome>().is_err());
}

#[test]
fn test_client_ready_and_shot() {
    assert_eq!("READY".parse::<ClientMessage>().unwrap(), ClientMessage::Ready);
    assert_eq!(" READY \r".parse::<ClientMessage>().unwrap(), ClientMessage::Ready);
    assert_eq!(
        "SHOT:7,-2".parse::<ClientMessage>().unwrap(),
        ClientMessage::Shot { x: 7, y: -2 }
    );
}

#[test]
fn test_client_ships_parse() {
    let msg: ClientMessage = "SHIPS:0,0;0,1;0,2|5,5||3,3;4,3;".parse().unwrap();
    assert_eq!(
        msg,
        ClientMessage::Ships(vec![
            vec![(0, 0), (0, 1), (0, 2)],
            vec![(5, 5)],
            vec![(3, 3), (4, 3)],
        ])
    );
    assert_eq!(msg.to_string(), "SHIPS:0,0;0,1;0,2|5,5|3,3;4,3");
    assert_eq!(
        "SHIPS:".parse::<ClientMessage>().unwrap(),
        ClientMessage::Ships(vec![])
    );
}

#[test]
fn test_client_malformed_lines() {
    assert!(matches!(
        "SHOT:1".parse::<ClientMessage>(),
        Err(ProtocolError::BadCoordinate(_))
    ));
    assert!(matches!(
        "SHOT:a,b".parse::<ClientMessage>(),
        Err(ProtocolError::BadNumber(_))
    ));
    assert!(matches!(
        "SHIPS:0,0;x".parse::<ClientMessage>(),
        Err(ProtocolError::BadCoordinate(_))
    ));
    assert!(matches!(
        "FIRE:1,1".parse::<ClientMessage>(),
        Err(ProtocolError::UnknownMessage(_))
    ));
    assert!("shot:1,1".parse::<ClientMessage>().is_err());
}
