use crate::infra::{InMemoryAccountDirectory, InMemoryAssessmentRepository, InMemoryCommunityRepository};
use clap::Args;
use std::sync::Arc;
use stillmind::assessments::domain::AssessmentType;
use stillmind::assessments::scoring::{self, ScoringError};
use stillmind::assessments::{AssessmentService, AssessmentSubmission};
use stillmind::auth::{AuthService, TokenAuthenticator};
use stillmind::community::{CommunityService, NewComment, NewPost};
use stillmind::config::AuthConfig;
use stillmind::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Assessment type (PHQ-9 or GAD-7)
    #[arg(long = "type")]
    pub(crate) kind: String,
    /// Comma-separated responses, each 0-3 (e.g. 0,1,2,3,0,1,2,0,1)
    #[arg(long, value_delimiter = ',')]
    pub(crate) responses: Vec<i64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the community feed portion of the demo
    #[arg(long)]
    pub(crate) skip_community: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let kind = AssessmentType::parse(&args.kind).ok_or_else(|| {
        AppError::from(ScoringError::InvalidType {
            raw: args.kind.trim().to_string(),
        })
    })?;
    let outcome = scoring::score(kind, &args.responses).map_err(AppError::from)?;

    println!(
        "{} score {} -> {}",
        kind.label(),
        outcome.score,
        outcome.severity
    );
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Stillmind walkthrough (in-memory stores, nothing persisted)");

    let tokens = Arc::new(TokenAuthenticator::new(&AuthConfig {
        jwt_secret: "stillmind-demo-secret".to_string(),
        token_ttl_minutes: 60,
    }));
    let directory = Arc::new(InMemoryAccountDirectory::default());
    let auth = AuthService::new(directory.clone(), tokens);
    let assessments = AssessmentService::new(Arc::new(InMemoryAssessmentRepository::default()));

    println!("\nRegistration and login");
    let account = match auth.register("demo@stillmind.app", "demo-password") {
        Ok(account) => account,
        Err(err) => {
            println!("  Registration rejected: {err}");
            return Ok(());
        }
    };
    println!("- Registered {} as {}", account.email, account.id.0);

    match auth.login("demo@stillmind.app", "demo-password") {
        Ok(token) => println!("- Session token issued ({} bytes)", token.len()),
        Err(err) => println!("- Login failed: {err}"),
    }

    println!("\nAssessment intake");
    let submissions = [
        ("PHQ-9", vec![0, 1, 1, 1, 0, 1, 1, 0, 0]),
        ("PHQ-9", vec![2, 2, 2, 2, 2, 1, 1, 1, 1]),
        ("GAD-7", vec![1, 1, 1, 1, 1, 1, 1]),
    ];
    for (kind, responses) in submissions {
        let submission = AssessmentSubmission {
            kind: Some(kind.to_string()),
            responses: Some(responses.into_iter().map(serde_json::Value::from).collect()),
        };
        match assessments.submit(&account.id, submission) {
            Ok(record) => println!(
                "- {} scored {} -> {} ({})",
                record.kind, record.score, record.severity, record.id.0
            ),
            Err(err) => println!("- Submission rejected: {err}"),
        }
    }

    match assessments.summary(&account.id) {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("\nPer-type summary:\n{json}"),
            Err(err) => println!("\nSummary unavailable: {err}"),
        },
        Err(err) => println!("\nSummary unavailable: {err}"),
    }

    if args.skip_community {
        return Ok(());
    }

    println!("\nCommunity feed");
    let community = CommunityService::new(Arc::new(InMemoryCommunityRepository::default()));
    let post = match community.create_post(
        &account.id,
        NewPost {
            title: Some("Small wins thread".to_string()),
            body: Some("Got outside for a walk today.".to_string()),
            image_url: None,
        },
    ) {
        Ok(post) => post,
        Err(err) => {
            println!("- Post rejected: {err}");
            return Ok(());
        }
    };
    println!("- Posted {} by {}", post.id.0, post.author.0);

    if let Err(err) = community.like(&post.id, &account.id) {
        println!("- Like failed: {err}");
    }
    match community.comment(
        &post.id,
        &account.id,
        NewComment {
            content: Some("Keep it going!".to_string()),
        },
    ) {
        Ok(comment) => println!("- Comment {} added", comment.id),
        Err(err) => println!("- Comment failed: {err}"),
    }

    match community.feed() {
        Ok(feed) => match serde_json::to_string_pretty(&feed) {
            Ok(json) => println!("\nFeed snapshot:\n{json}"),
            Err(err) => println!("\nFeed unavailable: {err}"),
        },
        Err(err) => println!("\nFeed unavailable: {err}"),
    }

    Ok(())
}
