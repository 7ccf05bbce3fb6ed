use magnus_core::{Board, Color, Move, Piece, PieceType, Square};
use magnus_engine::{best_move, BotConfig, ChessBot, Difficulty};

fn sq(notation: &str) -> Square {
    Square::from_algebraic(notation).unwrap()
}

#[test]
fn bots_play_a_legal_opening_against_each_other() {
    let white = ChessBot::new(BotConfig {
        side: Color::White,
        difficulty: Difficulty::Beginner,
    });
    let black = ChessBot::new(BotConfig {
        side: Color::Black,
        difficulty: Difficulty::Beginner,
    });
    let mut board = Board::new();

    for ply in 0..8 {
        if board.is_game_over() {
            break;
        }
        let bot = if ply % 2 == 0 { &white } else { &black };
        let mv = bot.choose_move(&mut board).expect("a move must exist");
        board.play(mv).expect("bot moves must be legal");
    }

    // Eight bot plies leave a live middlegame with both kings on the board.
    assert!(board
        .legal_moves()
        .iter()
        .all(|mv| board.piece_at(mv.from).is_some()));
}

#[test]
fn bot_grabs_a_hanging_queen() {
    let bot = ChessBot::new(BotConfig {
        side: Color::White,
        difficulty: Difficulty::Intermediate,
    });
    let mut board = Board::empty();
    board.place(sq("e1"), Piece::new(PieceType::King, Color::White));
    board.place(sq("d1"), Piece::new(PieceType::Rook, Color::White));
    board.place(sq("e8"), Piece::new(PieceType::King, Color::Black));
    board.place(sq("d4"), Piece::new(PieceType::Queen, Color::Black));

    let mv = bot.choose_move(&mut board).expect("capture available");
    assert_eq!(mv, Move::new(sq("d1"), sq("d4")));
    board.play(mv).unwrap();
    assert_eq!(
        board.piece_at(sq("d4")),
        Some(Piece::new(PieceType::Rook, Color::White))
    );
}

#[test]
fn bot_declines_when_the_game_is_over() {
    let bot = ChessBot::new(BotConfig {
        side: Color::Black,
        difficulty: Difficulty::Pro,
    });
    let mut board = Board::empty();
    board.place(sq("h8"), Piece::new(PieceType::King, Color::Black));
    board.place(sq("g7"), Piece::new(PieceType::Pawn, Color::Black));
    board.place(sq("h7"), Piece::new(PieceType::Pawn, Color::Black));
    board.place(sq("a8"), Piece::new(PieceType::Rook, Color::White));
    board.place(sq("a1"), Piece::new(PieceType::King, Color::White));
    board.set_side_to_move(Color::Black);

    assert!(board.is_checkmate());
    assert_eq!(bot.choose_move(&mut board), None);
}

#[test]
fn search_leaves_the_host_board_untouched() {
    let mut board = Board::new();
    board.play(Move::new(sq("e2"), sq("e4"))).unwrap();
    board.play(Move::new(sq("e7"), sq("e5"))).unwrap();
    let before = board.clone();

    best_move(&mut board, Color::White, 2);
    assert_eq!(board, before);
}

#[test]
fn deeper_search_still_takes_the_forced_material() {
    // White wins the queen whether it looks one ply ahead or four.
    for difficulty in [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Pro,
    ] {
        let bot = ChessBot::new(BotConfig {
            side: Color::White,
            difficulty,
        });
        let mut board = Board::empty();
        board.place(sq("e1"), Piece::new(PieceType::King, Color::White));
        board.place(sq("d1"), Piece::new(PieceType::Rook, Color::White));
        board.place(sq("e8"), Piece::new(PieceType::King, Color::Black));
        board.place(sq("d4"), Piece::new(PieceType::Queen, Color::Black));

        assert_eq!(
            bot.choose_move(&mut board),
            Some(Move::new(sq("d1"), sq("d4"))),
            "{difficulty:?}"
        );
    }
}
