//! End-to-end pipeline scenarios against a scripted provider

mod common;

use std::path::PathBuf;
use std::sync::Arc;

use chunkreview_pipeline::{
    AnalysisKind, Document, PipelineError, PipelineSelector, ProjectOverview, Prompts, Reviewer,
    ReviewConfig, SummaryStage,
};
use chunkreview_tokens::{Chunker, TokenizerAdapter};
use common::{context, system_prompt, test_config, user_content, words, write_file, ScriptedProvider};

#[tokio::test]
async fn test_single_small_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "small.rs", &words(500));
    let provider = Arc::new(ScriptedProvider::new());

    let result = PipelineSelector::new(context(provider.clone(), test_config()))
        .run(&[path])
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 1);
    assert_eq!(result.sections.len(), 1);
    assert_eq!(result.sections[0].index, 1);
    assert_eq!(result.sections[0].text, "reply to Part 1 of file small.rs:");
    assert_eq!(
        result.kind,
        AnalysisKind::Review {
            document: "small.rs".to_string()
        }
    );

    let request = &provider.requests()[0];
    assert_eq!(system_prompt(request), Prompts::default().review());
    assert!(user_content(request).starts_with("Part 1 of file small.rs:\nhello hello"));
    assert_eq!(request.model, "gpt-4");
    assert_eq!(request.max_tokens, Some(1500));
    assert!(result.render().contains("=== Code review of file small.rs ==="));
}

#[tokio::test]
async fn test_single_large_file_in_chunk_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "large.rs", &words(6500));
    let provider = Arc::new(ScriptedProvider::new());

    let result = PipelineSelector::new(context(provider.clone(), test_config()))
        .run(&[path])
        .await
        .unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 3);
    for (i, request) in requests.iter().enumerate() {
        let prefix = format!("Part {} of file large.rs:\n", i + 1);
        assert!(user_content(request).starts_with(&prefix));
    }

    let tokenizer = TokenizerAdapter::new();
    let sizes: Vec<usize> = requests
        .iter()
        .map(|r| {
            let chunk = user_content(r).split_once('\n').unwrap().1;
            tokenizer.count_tokens(chunk, "gpt-4").unwrap()
        })
        .collect();
    assert_eq!(sizes, vec![3000, 3000, 500]);

    let indices: Vec<usize> = result.sections.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_reviewer_contains_failed_chunk() {
    let provider = Arc::new(ScriptedProvider::new().failing_on(&[2]));
    let reviewer = Reviewer::new(context(provider.clone(), test_config()));

    let result = reviewer
        .review(&Document::new("large.rs", words(6500)))
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 3);
    assert_eq!(result.sections.len(), 3);
    assert!(!result.sections[0].is_empty());
    assert!(result.sections[1].is_empty());
    assert!(!result.sections[2].is_empty());
    assert_eq!(result.failed_sections(), 1);
    assert!(result.render().contains("--- Result of part 2 ---\n(no response)"));
}

#[tokio::test]
async fn test_summary_stage_labels_parts() {
    let provider = Arc::new(ScriptedProvider::new().failing_on(&[1]));
    let stage = SummaryStage::new(context(provider.clone(), test_config()));

    let summary = stage
        .summarize(&Document::new("lib.rs", words(3500)))
        .await
        .unwrap();

    assert_eq!(summary.document, "lib.rs");
    assert_eq!(summary.parts.len(), 2);
    assert!(summary.parts[0].is_empty());
    assert!(!summary.parts[1].is_empty());
    assert!(summary.text().starts_with("- Part 1: \n- Part 2: reply to "));
    for request in provider.requests() {
        assert_eq!(system_prompt(&request), Prompts::default().summary());
        assert!(user_content(&request).trim_start().starts_with("hello"));
    }
}

#[tokio::test]
async fn test_empty_document_makes_no_calls() {
    let provider = Arc::new(ScriptedProvider::new());
    let result = Reviewer::new(context(provider.clone(), test_config()))
        .review(&Document::new("empty.rs", ""))
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 0);
    assert!(result.sections.is_empty());
}

#[tokio::test]
async fn test_multi_file_project() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_file(dir.path(), "a.rs", &words(800)),
        write_file(dir.path(), "b.rs", &words(1200)),
        write_file(dir.path(), "c.rs", &words(300)),
    ];
    let provider = Arc::new(ScriptedProvider::new());

    let result = PipelineSelector::new(context(provider.clone(), test_config()))
        .run(&paths)
        .await
        .unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 4);

    let summary_prompt = Prompts::default().summary();
    assert!(requests[..3].iter().all(|r| system_prompt(r) == summary_prompt));

    let architecture = &requests[3];
    for name in ["a.rs", "b.rs", "c.rs"] {
        assert!(system_prompt(architecture).contains(name));
    }
    assert!(system_prompt(architecture).contains("Project files: a.rs, b.rs, c.rs."));
    assert!(user_content(architecture).starts_with("Part 1 of the project overview:\n### a.rs\n- Part 1: "));

    assert_eq!(result.summaries.len(), 3);
    assert_eq!(result.sections.len(), 1);
    assert_eq!(
        result.kind,
        AnalysisKind::Aggregate {
            documents: vec!["a.rs".to_string(), "b.rs".to_string(), "c.rs".to_string()]
        }
    );

    let rendered = result.render();
    assert!(rendered.contains("=== Summary of file b.rs ==="));
    assert!(rendered.contains("=== Project overview ==="));
}

#[tokio::test]
async fn test_missing_file_among_many() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.txt", &words(200));
    let b = dir.path().join("b.txt");
    let c = write_file(dir.path(), "c.txt", &words(200));
    let provider = Arc::new(ScriptedProvider::new());

    let result = PipelineSelector::new(context(provider.clone(), test_config()))
        .run(&[a, b.clone(), c])
        .await
        .unwrap();

    assert_eq!(result.skipped, vec![b]);
    assert_eq!(result.summaries.len(), 2);
    assert!(!result.sections.is_empty());
    assert!(!result.sections[0].is_empty());

    let requests = provider.requests();
    assert_eq!(requests.len(), 3);
    let overview = user_content(&requests[2]);
    assert!(overview.contains("### a.txt"));
    assert!(overview.contains("### c.txt"));
    assert!(!overview.contains("b.txt"));
    assert!(!system_prompt(&requests[2]).contains("b.txt"));
}

#[tokio::test]
async fn test_aggregator_contains_failed_summary() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_file(dir.path(), "a.rs", &words(100)),
        write_file(dir.path(), "b.rs", &words(100)),
    ];
    let provider = Arc::new(ScriptedProvider::new().failing_on(&[1]));

    let result = PipelineSelector::new(context(provider.clone(), test_config()))
        .run(&paths)
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 3);
    assert!(result.summaries[0].parts[0].is_empty());
    assert!(!result.summaries[1].parts[0].is_empty());
    assert_eq!(result.sections.len(), 1);
    assert!(user_content(&provider.requests()[2]).contains("### a.rs\n- Part 1: \n\n### b.rs"));
}

#[tokio::test]
async fn test_large_overview_is_rechunked() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<PathBuf> = ["a.rs", "b.rs", "c.rs"]
        .iter()
        .map(|name| write_file(dir.path(), name, &words(120)))
        .collect();
    let config = ReviewConfig {
        max_tokens_per_chunk: 50,
        ..test_config()
    };
    let provider = Arc::new(ScriptedProvider::new());

    let result = PipelineSelector::new(context(provider.clone(), config))
        .run(&paths)
        .await
        .unwrap();

    let summary_calls = provider
        .requests()
        .iter()
        .filter(|r| !user_content(r).starts_with("Part "))
        .count();
    assert_eq!(summary_calls, 9);

    let overview = ProjectOverview::from_summaries(&result.summaries).render();
    let expected = Chunker::new(Arc::new(TokenizerAdapter::new()), "gpt-4", 50)
        .unwrap()
        .chunk(&overview)
        .unwrap()
        .len();
    assert!(expected > 1);
    assert_eq!(result.sections.len(), expected);
    assert_eq!(provider.call_count(), 9 + expected);
}

#[tokio::test]
async fn test_architecture_pass_contains_failed_section() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<PathBuf> = ["a.rs", "b.rs", "c.rs"]
        .iter()
        .map(|name| write_file(dir.path(), name, &words(120)))
        .collect();
    let config = ReviewConfig {
        max_tokens_per_chunk: 50,
        ..test_config()
    };
    // Calls 1-9 are summaries; call 11 is the second overview chunk
    let provider = Arc::new(ScriptedProvider::new().failing_on(&[11]));

    let result = PipelineSelector::new(context(provider.clone(), config))
        .run(&paths)
        .await
        .unwrap();

    let overview = ProjectOverview::from_summaries(&result.summaries).render();
    let expected = Chunker::new(Arc::new(TokenizerAdapter::new()), "gpt-4", 50)
        .unwrap()
        .chunk(&overview)
        .unwrap()
        .len();
    assert!(expected > 1);

    assert_eq!(provider.call_count(), 9 + expected);
    assert_eq!(result.sections.len(), expected);
    assert_eq!(result.failed_sections(), 1);
    assert!(result.sections[1].is_empty());
    assert!(!result.sections[0].is_empty());
    assert!(result.sections[2..].iter().all(|s| !s.is_empty()));

    let architecture_parts: Vec<_> = provider.requests()[9..]
        .iter()
        .map(|r| user_content(r).split_whitespace().nth(1).unwrap().to_string())
        .collect();
    let in_order: Vec<String> = (1..=expected).map(|i| i.to_string()).collect();
    assert_eq!(architecture_parts, in_order);
}

#[tokio::test]
async fn test_selector_rejects_empty_input() {
    let provider = Arc::new(ScriptedProvider::new());
    let result = PipelineSelector::new(context(provider.clone(), test_config()))
        .run(&[])
        .await;

    assert!(matches!(result, Err(PipelineError::NoDocuments)));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_single_missing_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.rs");
    let provider = Arc::new(ScriptedProvider::new());

    let result = PipelineSelector::new(context(provider.clone(), test_config()))
        .run(&[missing.clone()])
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 0);
    assert!(result.sections.is_empty());
    assert_eq!(result.skipped, vec![missing]);
}

#[tokio::test]
async fn test_invalid_encoding_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_file(dir.path(), "good.rs", &words(50));
    let bad = dir.path().join("bad.rs");
    std::fs::write(&bad, [0xc3, 0x28]).unwrap();
    let provider = Arc::new(ScriptedProvider::new());

    let result = PipelineSelector::new(context(provider.clone(), test_config()))
        .run(&[good, bad])
        .await;

    assert!(matches!(result, Err(PipelineError::InvalidEncoding { .. })));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_response_language_reaches_every_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_file(dir.path(), "a.rs", &words(10)),
        write_file(dir.path(), "b.rs", &words(10)),
    ];
    let config = ReviewConfig {
        response_language: Some("French".to_string()),
        ..test_config()
    };
    let provider = Arc::new(ScriptedProvider::new());

    PipelineSelector::new(context(provider.clone(), config))
        .run(&paths)
        .await
        .unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests
        .iter()
        .all(|r| system_prompt(r).ends_with("Respond in French.")));
}
