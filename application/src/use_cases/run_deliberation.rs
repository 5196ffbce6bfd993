//! Run Deliberation use case
//!
//! Drives the round loop: broadcast the current proposal, gate every
//! expert, collect contributions, let the coordinator revise, score the
//! whole log, then continue or stop.

use crate::config::DeliberationParams;
use crate::ports::completion::{
    CompletionError, CompletionPurpose, CompletionRequest, CompletionService,
};
use crate::ports::progress::{DeliberationProgress, NoProgress};
use crate::ports::transcript::{NoTranscript, TranscriptSink};
use council_domain::message::failure_notice;
use council_domain::{
    ConsensusAnalysis, ConsensusScorer, DeliberationOutcome, DeliberationPolicy, DomainError,
    GateCheck, GateDecision, GateReason, Message, MessageLog, PromptTemplate, Proposal,
    RoundPhase, RoundRecord, Roster, RoutingFilter, SpeakerGate, Termination, TranscriptLine,
    Transition,
};
use futures::future::join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Upper bound on itemised changes requested per revision
const MAX_CHANGES_PER_REVISION: usize = 5;

/// Errors that prevent a deliberation from starting
#[derive(Error, Debug)]
pub enum RunDeliberationError {
    #[error("Invalid deliberation input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the RunDeliberation use case
#[derive(Debug, Clone)]
pub struct RunDeliberationInput {
    pub proposal: Proposal,
    pub roster: Roster,
    pub policy: DeliberationPolicy,
    pub params: DeliberationParams,
}

impl RunDeliberationInput {
    pub fn new(proposal: Proposal, roster: Roster) -> Self {
        Self {
            proposal,
            roster,
            policy: DeliberationPolicy::default(),
            params: DeliberationParams::default(),
        }
    }

    pub fn with_policy(mut self, policy: DeliberationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_params(mut self, params: DeliberationParams) -> Self {
        self.params = params;
        self
    }
}

/// Mutable state of one run, owned by the orchestrator
struct RunState {
    log: MessageLog,
    /// Current proposal text, replaced after each well-formed revision
    proposal: String,
    rng: StdRng,
}

/// Read-only collaborators shared by every round
struct RoundContext<'a> {
    input: &'a RunDeliberationInput,
    scorer: &'a ConsensusScorer,
    progress: &'a dyn DeliberationProgress,
}

type CompletionResult = Result<String, CompletionError>;

/// Use case for running a deliberation
pub struct RunDeliberationUseCase<S: CompletionService + 'static> {
    service: Arc<S>,
    transcript: Arc<dyn TranscriptSink>,
    cancellation_token: Option<CancellationToken>,
}

impl<S: CompletionService + 'static> RunDeliberationUseCase<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            transcript: Arc::new(NoTranscript),
            cancellation_token: None,
        }
    }

    /// Emit every message and round to `sink`
    pub fn with_transcript(mut self, sink: Arc<dyn TranscriptSink>) -> Self {
        self.transcript = sink;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunDeliberationInput,
    ) -> Result<DeliberationOutcome, RunDeliberationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks.
    ///
    /// Only invalid input is an error. Running out of rounds and external
    /// cancellation both end normally and are reported in the outcome.
    pub async fn execute_with_progress(
        &self,
        input: RunDeliberationInput,
        progress: &dyn DeliberationProgress,
    ) -> Result<DeliberationOutcome, RunDeliberationError> {
        input.policy.validate()?;
        if !input.params.budget.is_finite() {
            return Err(RunDeliberationError::InvalidInput(format!(
                "budget must be finite, got {}",
                input.params.budget
            )));
        }

        let max_rounds = input.params.max_rounds();
        let scorer = input.policy.scorer(&input.roster);
        let mut state = RunState {
            log: MessageLog::new(),
            proposal: input.proposal.content().to_string(),
            rng: match input.params.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
        };

        info!(
            "Starting deliberation: {} expert(s), up to {} rounds",
            input.roster.experts().len(),
            max_rounds
        );

        let ctx = RoundContext {
            input: &input,
            scorer: &scorer,
            progress,
        };
        let mut records: Vec<RoundRecord> = Vec::new();
        let mut round = 0;
        let termination = loop {
            if self.is_cancelled() {
                break Termination::Cancelled;
            }
            round += 1;
            info!("Round {}/{}", round, max_rounds);
            progress.on_round_start(round, max_rounds);

            let Some(record) = self.run_round(&ctx, &mut state, round).await else {
                info!("Deliberation cancelled during round {}", round);
                break Termination::Cancelled;
            };
            self.transcript.on_round(&record);
            progress.on_round_complete(&record);

            let reached = scorer.reached(&record.analysis);
            records.push(record);
            match Transition::after_round(reached, round, max_rounds) {
                Transition::Continue => continue,
                Transition::Terminate(termination) => break termination,
            }
        };

        let analysis = records
            .last()
            .map(|r| r.analysis.clone())
            .unwrap_or_else(|| ConsensusAnalysis::empty(0, scorer.criteria()));
        let unmet = if termination.is_consensus() {
            Vec::new()
        } else {
            scorer.criteria().unmet(&analysis)
        };
        info!(
            "Deliberation ended after {} round(s): {} (score {:.1})",
            records.len(),
            termination,
            analysis.score
        );

        let outcome = DeliberationOutcome {
            initial_proposal: input.proposal.content().to_string(),
            final_proposal: state.proposal,
            termination,
            rounds_completed: records.len() as u32,
            budget: input.params.budget,
            analysis,
            unmet,
            records,
            messages: state.log.into_messages(),
        };
        progress.on_finished(&outcome);
        Ok(outcome)
    }

    /// Run one round through the phase machine.
    ///
    /// Returns `None` when cancellation is observed at a phase boundary.
    async fn run_round(
        &self,
        ctx: &RoundContext<'_>,
        state: &mut RunState,
        round: u32,
    ) -> Option<RoundRecord> {
        let roster = &ctx.input.roster;
        let format = &ctx.input.policy.format;
        // Gate decisions read the log as it stood before this round began
        let snapshot_len = state.log.len();

        let mut gate: Vec<GateDecision> = Vec::new();
        let mut speakers: Vec<usize> = Vec::new();
        let mut contributors: Vec<String> = Vec::new();
        let mut failed_contributors: Vec<String> = Vec::new();
        let mut revised = false;
        let mut revision_failed = false;
        let mut record = None;

        let mut phase = Some(RoundPhase::Broadcast);
        while let Some(current) = phase {
            if self.is_cancelled() {
                return None;
            }
            debug!("Round {}: {} phase", round, current);

            match current {
                RoundPhase::Broadcast => {
                    ctx.progress.on_phase_start(round, current, 1);
                    let message = Message::proposal_broadcast(state.proposal.clone(), round);
                    self.append(&mut state.log, message);
                }
                RoundPhase::Gate => {
                    ctx.progress
                        .on_phase_start(round, current, roster.experts().len());
                    gate = self
                        .gate_phase(ctx, state.log.prefix(snapshot_len), &mut state.rng, round)
                        .await?;
                    for decision in &gate {
                        ctx.progress.on_gate_decision(round, decision);
                    }
                    speakers = gate
                        .iter()
                        .enumerate()
                        .filter(|(_, d)| d.speaks())
                        .map(|(i, _)| i)
                        .collect();
                    info!(
                        "Round {}: {} of {} expert(s) will speak",
                        round,
                        speakers.len(),
                        gate.len()
                    );
                }
                RoundPhase::Contribute => {
                    ctx.progress.on_phase_start(round, current, speakers.len());
                    let results = self
                        .contribute_phase(ctx, state.log.messages(), &speakers, round)
                        .await?;

                    // Appended in roster order regardless of completion order
                    for (index, result) in results {
                        let expert = &roster.experts()[index];
                        let content = match result {
                            Ok(text) => {
                                contributors.push(expert.name().to_string());
                                ctx.progress.on_contribution(round, expert.name(), true);
                                text
                            }
                            Err(e) => {
                                warn!("Expert {} failed to contribute: {}", expert.name(), e);
                                failed_contributors.push(expert.name().to_string());
                                ctx.progress.on_contribution(round, expert.name(), false);
                                failure_notice(&e.to_string())
                            }
                        };
                        let message = Message::expert_feedback(
                            expert,
                            roster.coordinator().name(),
                            content,
                            round,
                        );
                        self.append(&mut state.log, message);
                    }
                }
                RoundPhase::Revise => {
                    ctx.progress.on_phase_start(round, current, 1);
                    let coordinator = roster.coordinator();
                    let prompt = {
                        let memory = RoutingFilter::visible(coordinator, state.log.messages());
                        PromptTemplate::coordinator_revision(
                            coordinator,
                            &memory,
                            format,
                            MAX_CHANGES_PER_REVISION,
                        )
                    };
                    let request = CompletionRequest::new(
                        coordinator.name(),
                        CompletionPurpose::CoordinatorRevision,
                        round,
                        prompt,
                    );
                    let result = self
                        .until_cancelled(Self::complete(&self.service, &request))
                        .await?;

                    let content = match result {
                        Ok(text) => {
                            let extracted = format.extract_text(&text);
                            if format.is_version(&text) && !extracted.is_empty() {
                                state.proposal = extracted.to_string();
                            } else {
                                warn!(
                                    "Round {}: revision lacks '{}', proposal unchanged",
                                    round, format.revision_marker
                                );
                            }
                            ctx.progress.on_revision(round, true);
                            text
                        }
                        Err(e) => {
                            warn!("Coordinator revision failed: {}", e);
                            revision_failed = true;
                            ctx.progress.on_revision(round, false);
                            failure_notice(&e.to_string())
                        }
                    };
                    revised = true;
                    let message = Message::coordinator_revision(coordinator, content, round);
                    self.append(&mut state.log, message);
                }
                RoundPhase::Score => {
                    ctx.progress.on_phase_start(round, current, 1);
                    let analysis = ctx.scorer.analyze(state.log.messages(), round);
                    info!(
                        "Round {}: score {:.1} (+{:.2} / -{:.2}), {} substantial change(s)",
                        round,
                        analysis.score,
                        analysis.positive,
                        analysis.negative,
                        analysis.substantial_changes
                    );
                    record = Some(RoundRecord {
                        round,
                        gate: std::mem::take(&mut gate),
                        contributors: std::mem::take(&mut contributors),
                        failed_contributors: std::mem::take(&mut failed_contributors),
                        revised,
                        revision_failed,
                        analysis,
                    });
                }
            }

            phase = current.next(speakers.len());
        }

        record
    }

    /// Decide who speaks this round.
    ///
    /// Local checks run in roster order so the random draws are reproducible
    /// for a given seed; only the confirmation calls may run concurrently.
    async fn gate_phase(
        &self,
        ctx: &RoundContext<'_>,
        snapshot: &[Message],
        rng: &mut StdRng,
        round: u32,
    ) -> Option<Vec<GateDecision>> {
        let policy = &ctx.input.policy.gate;
        let gate = SpeakerGate::new(policy);
        let experts = ctx.input.roster.experts();

        let mut checks = Vec::with_capacity(experts.len());
        let mut requests = Vec::new();
        for expert in experts {
            let memory = RoutingFilter::visible(expert, snapshot);
            let check = gate.evaluate(expert, &memory, rng);
            if matches!(check, GateCheck::Confirm { .. }) {
                requests.push(CompletionRequest::new(
                    expert.name(),
                    CompletionPurpose::SpeakConfirmation,
                    round,
                    PromptTemplate::speak_confirmation(expert, &memory, policy),
                ));
            }
            checks.push(check);
        }

        let replies: Vec<CompletionResult> = if ctx.input.params.concurrent {
            let calls = requests.iter().map(|r| Self::complete(&self.service, r));
            self.until_cancelled(join_all(calls)).await?
        } else {
            let mut replies = Vec::with_capacity(requests.len());
            for request in &requests {
                replies.push(
                    self.until_cancelled(Self::complete(&self.service, request))
                        .await?,
                );
            }
            replies
        };

        let mut replies = replies.into_iter();
        let decisions = experts
            .iter()
            .zip(checks)
            .map(|(expert, check)| {
                let reason = match check {
                    GateCheck::Decided(reason) => reason,
                    GateCheck::Confirm { relevance, streak } => match replies.next() {
                        Some(Ok(reply)) => gate.interpret_confirmation(&reply, relevance, streak),
                        Some(Err(e)) => {
                            warn!("{}: speak confirmation failed: {}", expert.name(), e);
                            GateReason::ServiceFailure {
                                error: e.to_string(),
                            }
                        }
                        None => GateReason::ServiceFailure {
                            error: "no confirmation reply".to_string(),
                        },
                    },
                };
                info!("Round {}: {} gate: {}", round, expert.name(), reason);
                GateDecision::new(expert.name(), reason)
            })
            .collect();
        Some(decisions)
    }

    /// One contribution per gated expert, returned in roster order.
    ///
    /// Every prompt is built from the same post-broadcast log, so experts
    /// never see each other's feedback from the current round.
    async fn contribute_phase(
        &self,
        ctx: &RoundContext<'_>,
        messages: &[Message],
        speakers: &[usize],
        round: u32,
    ) -> Option<Vec<(usize, CompletionResult)>> {
        let experts = ctx.input.roster.experts();
        let requests: Vec<(usize, CompletionRequest)> = speakers
            .iter()
            .map(|&index| {
                let expert = &experts[index];
                let memory = RoutingFilter::visible(expert, messages);
                let request = CompletionRequest::new(
                    expert.name(),
                    CompletionPurpose::ExpertFeedback,
                    round,
                    PromptTemplate::expert_feedback(expert, &memory),
                );
                (index, request)
            })
            .collect();

        if !ctx.input.params.concurrent {
            let mut results = Vec::with_capacity(requests.len());
            for (index, request) in &requests {
                let result = self
                    .until_cancelled(Self::complete(&self.service, request))
                    .await?;
                results.push((*index, result));
            }
            return Some(results);
        }

        let mut join_set = JoinSet::new();
        for (slot, (_, request)) in requests.iter().enumerate() {
            let service = Arc::clone(&self.service);
            let request = request.clone();
            join_set.spawn(async move {
                let result = Self::complete(&service, &request).await;
                (slot, result)
            });
        }

        let mut results: Vec<Option<CompletionResult>> = vec![None; requests.len()];
        self.until_cancelled(async {
            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok((slot, result)) => results[slot] = Some(result),
                    Err(e) => warn!("Task join error: {}", e),
                }
            }
        })
        .await?;

        Some(
            requests
                .into_iter()
                .zip(results)
                .map(|((index, _), result)| {
                    let result = result.unwrap_or_else(|| {
                        Err(CompletionError::RequestFailed(
                            "contribution task did not complete".to_string(),
                        ))
                    });
                    (index, result)
                })
                .collect(),
        )
    }

    /// Single completion call; blank output counts as a failure
    async fn complete(service: &S, request: &CompletionRequest) -> CompletionResult {
        debug!(
            "Completion for {} ({}, round {})",
            request.participant,
            request.purpose.as_str(),
            request.round
        );
        let text = service.complete(request).await?;
        if text.trim().is_empty() {
            return Err(CompletionError::EmptyResponse);
        }
        Ok(text)
    }

    /// Append to the log, then hand the stored message to the transcript
    fn append(&self, log: &mut MessageLog, message: Message) {
        let stored = log.append(message);
        debug!("{}", TranscriptLine::from_message(stored));
        self.transcript.on_message(stored);
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }

    /// Await `future` unless the token fires first; in-flight work is dropped
    async fn until_cancelled<F: Future>(&self, future: F) -> Option<F::Output> {
        match &self.cancellation_token {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => None,
                output = future => Some(output),
            },
            None => Some(future.await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use council_domain::{Causation, ConsensusCriteria};
    use std::sync::Mutex;

    type Responder = dyn Fn(&CompletionRequest) -> CompletionResult + Send + Sync;

    /// Mock service answering through a closure and recording every request
    struct ScriptedService {
        responder: Box<Responder>,
        calls: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedService {
        fn new(
            responder: impl Fn(&CompletionRequest) -> CompletionResult + Send + Sync + 'static,
        ) -> Self {
            Self {
                responder: Box::new(responder),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self, purpose: CompletionPurpose) -> Vec<CompletionRequest> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.purpose == purpose)
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedService {
        async fn complete(&self, request: &CompletionRequest) -> CompletionResult {
            self.calls.lock().unwrap().push(request.clone());
            (self.responder)(request)
        }
    }

    /// Recording transcript sink
    #[derive(Default)]
    struct RecordingSink {
        messages: Mutex<Vec<String>>,
        rounds: Mutex<Vec<u32>>,
    }

    impl TranscriptSink for RecordingSink {
        fn on_message(&self, message: &Message) {
            self.messages
                .lock()
                .unwrap()
                .push(TranscriptLine::from_message(message).encode());
        }

        fn on_round(&self, record: &RoundRecord) {
            self.rounds.lock().unwrap().push(record.round);
        }
    }

    fn input(params: DeliberationParams) -> RunDeliberationInput {
        RunDeliberationInput::new(
            Proposal::try_new("Open low-altitude corridors for drone delivery").unwrap(),
            Roster::default_council(),
        )
        .with_params(params)
    }

    fn plain_revision(request: &CompletionRequest) -> String {
        format!(
            "REVISED PROPOSAL:\nversion {}\nCHANGES MADE:\n1. tightened wording",
            request.round
        )
    }

    /// Experts answer once, then nothing in the revision concerns them
    fn quiet_council() -> ScriptedService {
        ScriptedService::new(|request| match request.purpose {
            CompletionPurpose::ExpertFeedback => {
                Ok(format!("建议: {} is fine. 同意", request.participant))
            }
            CompletionPurpose::CoordinatorRevision => Ok(plain_revision(request)),
            CompletionPurpose::SpeakConfirmation => Ok("PASS".to_string()),
        })
    }

    /// Every revision touches every expert's domain and everyone agrees
    fn agreeable_council() -> ScriptedService {
        ScriptedService::new(|request| match request.purpose {
            CompletionPurpose::ExpertFeedback => Ok("强烈同意".to_string()),
            CompletionPurpose::CoordinatorRevision => {
                let body = ((b'a' + request.round as u8) as char).to_string().repeat(40);
                Ok(format!(
                    "REVISED PROPOSAL:\n{}\nCHANGES MADE:\n1. 投资 法律 环境 制造 物流 基础设施\n强烈同意",
                    body
                ))
            }
            CompletionPurpose::SpeakConfirmation => Ok("SPEAK".to_string()),
        })
    }

    #[tokio::test]
    async fn test_first_round_everyone_speaks_then_silence() {
        let service = Arc::new(quiet_council());
        let use_case = RunDeliberationUseCase::new(service.clone());

        let outcome = use_case
            .execute(input(DeliberationParams::default().with_max_rounds(3)))
            .await
            .unwrap();

        assert_eq!(outcome.termination, Termination::RoundCeiling);
        assert_eq!(outcome.rounds_completed, 3);

        let first = &outcome.records[0];
        assert_eq!(first.contributors.len(), 6);
        assert!(first.gate.iter().all(|d| d.reason == GateReason::FirstRound));
        assert!(first.revised);

        for record in &outcome.records[1..] {
            assert_eq!(record.speaker_count(), 0);
            assert!(!record.revised);
            assert!(record.gate.iter().all(|d| d.reason == GateReason::Irrelevant));
        }

        // 1 broadcast + 6 feedback + 1 revision, then a bare broadcast per round
        assert_eq!(outcome.messages.len(), 10);
        assert!(service.calls(CompletionPurpose::SpeakConfirmation).is_empty());
        assert_eq!(service.calls(CompletionPurpose::CoordinatorRevision).len(), 1);
        assert_eq!(outcome.final_proposal, "version 1");
        assert!(!outcome.unmet.is_empty());
    }

    #[tokio::test]
    async fn test_prompts_respect_routing() {
        let service = Arc::new(quiet_council());
        let use_case = RunDeliberationUseCase::new(service.clone());
        use_case
            .execute(input(DeliberationParams::default().with_max_rounds(3)))
            .await
            .unwrap();

        let revision = &service.calls(CompletionPurpose::CoordinatorRevision)[0];
        for expert in Roster::default_council().experts() {
            assert!(revision.prompt.contains(&format!("{}: 建议", expert.name())));
        }

        for feedback in service.calls(CompletionPurpose::ExpertFeedback) {
            assert!(feedback.prompt.contains("moderator: Open low-altitude corridors"));
            assert!(!feedback.prompt.contains("建议:"));
        }
    }

    #[tokio::test]
    async fn test_messages_carry_causation_and_round() {
        let use_case = RunDeliberationUseCase::new(Arc::new(quiet_council()));
        let outcome = use_case
            .execute(input(DeliberationParams::default().with_max_rounds(3)))
            .await
            .unwrap();

        let causations: Vec<_> = outcome.messages[..8].iter().map(|m| m.causation()).collect();
        assert_eq!(causations[0], Causation::InitialProposal);
        assert!(causations[1..7].iter().all(|c| *c == Causation::ExpertFeedback));
        assert_eq!(causations[7], Causation::CoordinatorRevision);
        assert_eq!(outcome.messages[8].round(), 2);
        assert_eq!(outcome.messages[9].content(), "version 1");
    }

    #[tokio::test]
    async fn test_consensus_reached_once_all_gates_pass() {
        let service = Arc::new(agreeable_council());
        let use_case = RunDeliberationUseCase::new(service.clone());
        let mut policy = DeliberationPolicy::default();
        policy.criteria = ConsensusCriteria {
            min_rounds: 3,
            ..Default::default()
        };

        let outcome = use_case
            .execute(
                input(DeliberationParams::default().with_max_rounds(10).with_seed(7))
                    .with_policy(policy),
            )
            .await
            .unwrap();

        assert_eq!(outcome.termination, Termination::ConsensusReached);
        assert!(outcome.reached());
        assert_eq!(outcome.rounds_completed, 3);
        assert_eq!(outcome.version_count(), 3);
        assert_eq!(outcome.analysis.substantial_changes, 2);
        assert!(outcome.unmet.is_empty());
        assert_eq!(outcome.final_proposal, "d".repeat(40));

        // Rounds 1 and 2 score high but fail the round/changes gates
        assert!(outcome.records[0].analysis.score >= 85.0);
        assert!(!outcome.records[1].analysis.meets_round_requirement);

        // Rounds 2 and 3 required a confirmation from every expert
        assert_eq!(service.calls(CompletionPurpose::SpeakConfirmation).len(), 12);
        assert!(outcome.records[2]
            .gate
            .iter()
            .all(|d| matches!(d.reason, GateReason::Confirmed { .. })));
    }

    #[tokio::test]
    async fn test_failures_become_notices() {
        let service = Arc::new(ScriptedService::new(|request| {
            match (request.purpose, request.participant.as_str()) {
                (CompletionPurpose::ExpertFeedback, "economist") => Err(CompletionError::Timeout),
                (CompletionPurpose::ExpertFeedback, "logistics") => Ok("   ".to_string()),
                (CompletionPurpose::ExpertFeedback, _) => Ok("同意".to_string()),
                (CompletionPurpose::CoordinatorRevision, _) => {
                    Err(CompletionError::RequestFailed("boom".to_string()))
                }
                (CompletionPurpose::SpeakConfirmation, _) => Ok("SPEAK".to_string()),
            }
        }));
        let use_case = RunDeliberationUseCase::new(service);
        let outcome = use_case
            .execute(input(DeliberationParams::default().with_max_rounds(3)))
            .await
            .unwrap();

        let first = &outcome.records[0];
        assert_eq!(first.failed_contributors, vec!["economist", "logistics"]);
        assert_eq!(first.contributors.len(), 4);
        assert!(first.revised);
        assert!(first.revision_failed);

        let notices: Vec<_> = outcome.messages[..8]
            .iter()
            .filter(|m| m.content().starts_with("[generation failed"))
            .map(|m| m.content().to_string())
            .collect();
        assert_eq!(
            notices,
            vec![
                "[generation failed: Timeout]",
                "[generation failed: Empty response]",
                "[generation failed: Request failed: boom]",
            ]
        );
        assert_eq!(outcome.final_proposal, outcome.initial_proposal);
        assert_eq!(outcome.version_count(), 0);
    }

    #[tokio::test]
    async fn test_confirmation_failure_fails_closed() {
        let service = Arc::new(ScriptedService::new(|request| match request.purpose {
            CompletionPurpose::ExpertFeedback => Ok("fine".to_string()),
            CompletionPurpose::CoordinatorRevision => Ok(
                "REVISED PROPOSAL:\n投资 法律 环境 制造 物流 基础设施\nCHANGES MADE:\n1. x".to_string(),
            ),
            CompletionPurpose::SpeakConfirmation => {
                Err(CompletionError::ConnectionError("refused".to_string()))
            }
        }));
        let use_case = RunDeliberationUseCase::new(service);
        let outcome = use_case
            .execute(input(DeliberationParams::default().with_max_rounds(3)))
            .await
            .unwrap();

        let second = &outcome.records[1];
        assert_eq!(second.speaker_count(), 0);
        assert!(!second.revised);
        assert!(second
            .gate
            .iter()
            .all(|d| matches!(d.reason, GateReason::ServiceFailure { .. })));
    }

    #[tokio::test]
    async fn test_round_ceiling_is_clamped() {
        let use_case = RunDeliberationUseCase::new(Arc::new(quiet_council()));
        let outcome = use_case
            .execute(input(DeliberationParams::default().with_max_rounds(1)))
            .await
            .unwrap();
        assert_eq!(outcome.rounds_completed, 3);
        assert_eq!(outcome.termination, Termination::RoundCeiling);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let use_case =
            RunDeliberationUseCase::new(Arc::new(quiet_council())).with_cancellation(token);
        let outcome = use_case
            .execute(input(DeliberationParams::default()))
            .await
            .unwrap();

        assert_eq!(outcome.termination, Termination::Cancelled);
        assert_eq!(outcome.rounds_completed, 0);
        assert!(outcome.messages.is_empty());
        assert_eq!(outcome.analysis.score, 0.0);
    }

    #[tokio::test]
    async fn test_cancelled_mid_round_discards_scoring() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let service = Arc::new(ScriptedService::new(move |request| {
            match request.purpose {
                CompletionPurpose::CoordinatorRevision => {
                    trigger.cancel();
                    Ok(plain_revision(request))
                }
                _ => Ok("同意".to_string()),
            }
        }));
        let use_case = RunDeliberationUseCase::new(service).with_cancellation(token);
        let outcome = use_case
            .execute(input(DeliberationParams::default()))
            .await
            .unwrap();

        assert_eq!(outcome.termination, Termination::Cancelled);
        assert!(outcome.records.is_empty());
        // The revision finished before the boundary check and stays logged
        assert_eq!(outcome.messages.len(), 8);
    }

    #[tokio::test]
    async fn test_sequential_matches_concurrent() {
        let run = |params: DeliberationParams| async move {
            let use_case = RunDeliberationUseCase::new(Arc::new(agreeable_council()));
            use_case.execute(input(params)).await.unwrap()
        };

        let concurrent = run(DeliberationParams::default().with_seed(11)).await;
        let sequential = run(DeliberationParams::default().with_seed(11).sequential()).await;

        let contents = |o: &DeliberationOutcome| {
            o.messages
                .iter()
                .map(|m| (m.origin().to_string(), m.content().to_string()))
                .collect::<Vec<_>>()
        };
        assert_eq!(contents(&concurrent), contents(&sequential));
        assert_eq!(concurrent.termination, sequential.termination);
    }

    #[tokio::test]
    async fn test_transcript_sink_sees_everything() {
        let sink = Arc::new(RecordingSink::default());
        let use_case =
            RunDeliberationUseCase::new(Arc::new(quiet_council())).with_transcript(sink.clone());
        let outcome = use_case
            .execute(input(DeliberationParams::default().with_max_rounds(3)))
            .await
            .unwrap();

        let lines = sink.messages.lock().unwrap();
        assert_eq!(lines.len(), outcome.messages.len());
        assert!(lines[0].starts_with("[ROUND_1|moderator|"));
        assert!(lines[7].starts_with("[ROUND_1|policy-office|REVISED PROPOSAL:\\nversion 1"));
        assert_eq!(*sink.rounds.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_invalid_policy_is_rejected() {
        let mut policy = DeliberationPolicy::default();
        policy.criteria.score_threshold = 200.0;
        let use_case = RunDeliberationUseCase::new(Arc::new(quiet_council()));
        let result = use_case
            .execute(input(DeliberationParams::default()).with_policy(policy))
            .await;
        assert!(matches!(
            result,
            Err(RunDeliberationError::Domain(DomainError::InvalidPolicy(_)))
        ));
    }
}
