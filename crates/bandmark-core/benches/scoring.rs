use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bandmark_core::answer::{AnswerValue, UserAnswer};
use bandmark_core::model::{ChoiceMode, Question, QuestionKind};
use bandmark_core::scoring::{score_question, score_test};

fn forty_question_paper() -> (Vec<Question>, Vec<UserAnswer>) {
    let mut questions = Vec::new();
    let mut answers = Vec::new();

    for i in 0u32..40 {
        let id = format!("q{i}");
        let (kind, answer) = match i % 4 {
            0 => (
                QuestionKind::MultipleChoice {
                    mode: ChoiceMode::Single,
                    answer: (i % 4).into(),
                    options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                },
                AnswerValue::Index(i % 4),
            ),
            1 => (
                QuestionKind::TrueFalseNotGiven {
                    answer: "NOT GIVEN".into(),
                },
                AnswerValue::Text("NOT GIVEN".into()),
            ),
            2 => (
                QuestionKind::SentenceCompletion {
                    answer: "photosynthesis".into(),
                    word_limit: Some(1),
                },
                AnswerValue::Text(" Photosynthesis ".into()),
            ),
            _ => (
                QuestionKind::SummaryCompletion {
                    answer: vec!["carbon".to_string(), "oxygen".to_string()].into(),
                },
                AnswerValue::TextList(vec!["carbon".into(), "nitrogen".into()]),
            ),
        };
        questions.push(Question {
            id: id.clone(),
            text: String::new(),
            kind,
        });
        answers.push(UserAnswer {
            question_id: id,
            answer,
        });
    }

    (questions, answers)
}

fn bench_score_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_test");
    let (questions, answers) = forty_question_paper();

    group.bench_function("40_questions", |b| {
        b.iter(|| score_test(black_box(&questions), black_box(&answers)))
    });

    group.bench_function("40_questions_unanswered", |b| {
        b.iter(|| score_test(black_box(&questions), black_box(&[])))
    });

    group.finish();
}

fn bench_score_question(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_question");

    let table = Question {
        id: "q1".into(),
        text: String::new(),
        kind: QuestionKind::TableCompletion {
            answer: [
                ("row1".to_string(), vec!["a".to_string(), "b".to_string()].into()),
                ("row2".to_string(), vec!["c".to_string(), "d".to_string()].into()),
            ]
            .into_iter()
            .collect(),
        },
    };
    let submission = AnswerValue::Entries(
        [
            (
                "row1".to_string(),
                AnswerValue::TextList(vec!["a".into(), "x".into()]),
            ),
            (
                "row2".to_string(),
                AnswerValue::TextList(vec!["c".into(), "d".into()]),
            ),
        ]
        .into_iter()
        .collect(),
    );

    group.bench_function("table_completion", |b| {
        b.iter(|| score_question(black_box(&table), black_box(Some(&submission))))
    });

    group.finish();
}

criterion_group!(benches, bench_score_test, bench_score_question);
criterion_main!(benches);
