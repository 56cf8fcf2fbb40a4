use super::common::*;
use crate::workflows::results::analyzer::analyze;
use crate::workflows::results::domain::{Student, StudentId, Subject, SubjectId};
use crate::workflows::results::summary::{summarize, GradeCount};

#[test]
fn subject_summaries_follow_catalog_order() {
    let students = vec![student("s1", "1001", None), student("s2", "1002", None)];
    let mut scores = full_marks("s1", [80.0, 60.0, 40.0]);
    scores.extend(full_marks("s2", [70.0, 50.0, 30.0]));
    let config = grading_config();

    let run = analyze(&scores, &students, &core_subjects(), &config).expect("analysis");
    let summaries = run.summaries(&config);
    let summary = &summaries[0].summary;

    let names: Vec<&str> = summary
        .subjects
        .iter()
        .map(|subject| subject.subject.as_str())
        .collect();
    assert_eq!(names, vec!["Mathematics", "English", "Kiswahili"]);

    let math = &summary.subjects[0];
    assert_eq!(math.graded, 2);
    assert_eq!(math.mean_mark, 75.0);
    assert_eq!(math.mean_grade, grade("A-"));
}

#[test]
fn distribution_lists_every_grade_of_the_scale() {
    let students = vec![
        student("s1", "1001", None),
        student("s2", "1002", None),
        student("s3", "1003", None),
    ];
    let mut scores = full_marks("s1", [85.0, 60.0, 40.0]);
    scores.extend(full_marks("s2", [81.0, 50.0, 30.0]));
    scores.extend(full_marks("s3", [10.0, 50.0, 30.0]));
    let config = grading_config();

    let run = analyze(&scores, &students, &core_subjects(), &config).expect("analysis");
    let summary = summarize(&run.results, &config);

    let math = &summary.subjects[0].distribution;
    assert_eq!(math.len(), 12);
    assert_eq!(
        math[0],
        GradeCount {
            grade: grade("A"),
            count: 2
        }
    );
    assert_eq!(
        math.last(),
        Some(&GradeCount {
            grade: grade("E"),
            count: 1
        })
    );
    assert_eq!(math.iter().map(|entry| entry.count).sum::<usize>(), 3);
}

#[test]
fn class_summary_reports_means_and_overall_grades() {
    let students = vec![student("s1", "1001", None), student("s2", "1002", None)];
    let mut scores = full_marks("s1", [90.0, 90.0, 90.0]);
    scores.extend(full_marks("s2", [10.0, 10.0, 10.0]));
    let config = grading_config();

    let run = analyze(&scores, &students, &core_subjects(), &config).expect("analysis");
    let summaries = run.summaries(&config);
    let summary = &summaries[0].summary;

    assert_eq!(summary.students, 2);
    assert_eq!(summary.mean_total_marks, 150.0);
    // 36 points and 3 points.
    assert_eq!(summary.mean_total_points, 19.5);
    let overall: usize = summary
        .overall_distribution
        .iter()
        .map(|entry| entry.count)
        .sum();
    assert_eq!(overall, 2);
}

#[test]
fn empty_batch_summarizes_to_zeroes() {
    let summary = summarize(&[], &grading_config());

    assert_eq!(summary.students, 0);
    assert_eq!(summary.mean_total_marks, 0.0);
    assert!(summary.subjects.is_empty());
    assert!(summary
        .overall_distribution
        .iter()
        .all(|entry| entry.count == 0));
}

#[test]
fn mixed_forms_are_summarized_separately() {
    let form_three = |id: &str, admission_number: &str| Student {
        form: "Form 3".to_string(),
        ..student(id, admission_number, None)
    };
    let students = vec![
        student("s1", "1001", None),
        form_three("t1", "3001"),
        form_three("t2", "3002"),
    ];
    let mut subjects = core_subjects();
    subjects.push(Subject {
        id: SubjectId("chem".to_string()),
        name: "Chemistry".to_string(),
        form: "Form 3".to_string(),
    });
    let mut scores = full_marks("s1", [80.0, 60.0, 40.0]);
    scores.push(entry("t1", "chem", 90.0));
    scores.push(entry("t2", "chem", 50.0));
    let config = grading_config();

    let run = analyze(&scores, &students, &subjects, &config).expect("analysis");
    let summaries = run.summaries(&config);

    let forms: Vec<&str> = summaries.iter().map(|summary| summary.form.as_str()).collect();
    assert_eq!(forms, vec![FORM, "Form 3"]);
    assert_eq!(summaries[0].summary.students, 1);
    assert_eq!(summaries[0].summary.subjects.len(), 3);

    let form_three_summary = &summaries[1].summary;
    assert_eq!(form_three_summary.students, 2);
    assert_eq!(form_three_summary.subjects.len(), 1);
    assert_eq!(form_three_summary.subjects[0].mean_mark, 70.0);
    assert_eq!(
        run.result_for(&StudentId("t1".to_string()))
            .and_then(|result| result.overall_rank),
        Some(1)
    );
}
