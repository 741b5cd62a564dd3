use exam_prep::{
    parse_questions, InMemoryRepository, Intent, QuizMode, SelectionKey, Session, SessionState,
    StatisticsStore, DEFAULT_PROGRAM_ID,
};

const BANK: &str = r#"[
    {"theme_id":"T","theme_name":"Topic","block_id":"B","block_name":"Block","question":"First?","answers":{"1":"yes","2":"no"},"correct_answer":"1"},
    {"theme_id":"T","theme_name":"Topic","block_id":"B","block_name":"Block","question":"Second?","answers":{"1":"yes","2":"no"},"correct_answer":"2","article":"Art. 2"}
]"#;

fn start(repo: &InMemoryRepository) -> Session {
    let stats = StatisticsStore::load(Box::new(repo.clone()));
    let mut session = Session::new(stats);
    session.finish_loading(Ok(parse_questions(BANK).unwrap()));
    session
}

fn choose_block(session: &mut Session) {
    session.dispatch(Intent::SelectProgram(DEFAULT_PROGRAM_ID.to_string()));
    session.dispatch(Intent::SelectTopic("T".to_string()));
    session.dispatch(Intent::SelectBlock("B".to_string()));
}

fn answer(session: &mut Session, id: &str) {
    session.dispatch(Intent::SelectAnswer(id.to_string()));
    session.dispatch(Intent::SubmitAnswer);
    session.dispatch(Intent::NextQuestion);
}

#[test]
fn one_wrong_one_right_scores_half_and_persists() {
    let repo = InMemoryRepository::new();
    let mut session = start(&repo);

    choose_block(&mut session);
    session.dispatch(Intent::SelectMode(QuizMode::All));
    answer(&mut session, "2");
    answer(&mut session, "2");

    let SessionState::Results(quiz) = session.state() else {
        panic!("expected results, got {}", session.state().name());
    };
    let score = quiz.score();
    assert_eq!((score.correct, score.total, score.percentage), (1, 2, 50));

    let saved: serde_json::Value = serde_json::from_str(&repo.blob().unwrap()).unwrap();
    assert_eq!(
        saved,
        serde_json::json!({"prog2_T_B": {"correct": 1, "total": 2, "incorrectQuestions": [0]}})
    );
}

#[test]
fn statistics_survive_a_restart_and_feed_mistakes_mode() {
    let repo = InMemoryRepository::new();
    let mut session = start(&repo);
    choose_block(&mut session);
    session.dispatch(Intent::SelectMode(QuizMode::All));
    answer(&mut session, "2");
    answer(&mut session, "2");

    let mut restarted = start(&repo);
    choose_block(&mut restarted);
    restarted.dispatch(Intent::SelectMode(QuizMode::Mistakes));

    let SessionState::Active(quiz) = restarted.state() else {
        panic!("expected active quiz");
    };
    assert_eq!(quiz.questions().len(), 1);
    assert_eq!(quiz.current().unwrap().question.text, "First?");

    answer(&mut restarted, "1");
    let key = SelectionKey::new(DEFAULT_PROGRAM_ID, "T", "B");
    let stats = restarted.block_stats(&key);
    assert_eq!((stats.correct, stats.total), (2, 3));
    assert!(stats.incorrect_questions.is_empty());
}

#[test]
fn reset_from_every_state_including_results_returns_to_program_select() {
    let repo = InMemoryRepository::new();
    let mut session = start(&repo);

    let steps: Vec<Box<dyn Fn(&mut Session)>> = vec![
        Box::new(|_: &mut Session| {}),
        Box::new(|s: &mut Session| s.dispatch(Intent::SelectProgram(DEFAULT_PROGRAM_ID.to_string()))),
        Box::new(|s: &mut Session| s.dispatch(Intent::SelectTopic("T".to_string()))),
        Box::new(|s: &mut Session| s.dispatch(Intent::SelectBlock("B".to_string()))),
        Box::new(|s: &mut Session| s.dispatch(Intent::SelectMode(QuizMode::All))),
        Box::new(|s: &mut Session| s.dispatch(Intent::SelectAnswer("1".to_string()))),
        Box::new(|s: &mut Session| s.dispatch(Intent::SubmitAnswer)),
        Box::new(|s: &mut Session| s.dispatch(Intent::NextQuestion)),
        Box::new(|s: &mut Session| answer(s, "2")),
    ];

    for depth in 0..steps.len() {
        for step in &steps[..=depth] {
            step(&mut session);
        }
        if depth == steps.len() - 1 {
            assert!(matches!(session.state(), SessionState::Results(_)));
        }
        let saved = repo.blob();
        session.dispatch(Intent::Reset);

        assert!(matches!(session.state(), SessionState::ProgramSelect));
        assert_eq!(repo.blob(), saved);
    }
}
