//! Prompt construction for the simulated client and the post-session analyst.
//!
//! Both builders are deterministic in their inputs. The system prompt embeds
//! every persona and scenario field (name, role, background, each
//! personality trait, each goal, tone, difficulty, title, industry, product,
//! each objective, custom instructions) followed by the objection list and
//! target language. Completeness is the contract; the ordering is not.

use pitchroom_core::{ClientPersona, ConversationConfig, ConversationMessage, ScenarioConfig};

/// System instruction for the analysis call. Demands a single JSON object so
/// the adapter can parse a strictly-typed result.
pub const ANALYSIS_SYSTEM: &str = "You are a sales-coaching analyst. \
    Respond with a single JSON object and nothing else. The object must have: \
    overall_score (number 0-100); communication, content, tone, persuasion \
    (each an object with score 0-100, feedback string, examples array of \
    strings quoted from the conversation); improvements (array of strings); \
    strengths (array of strings). All fields are mandatory.";

/// Build the roleplay system prompt for `(persona, scenario, language)`.
pub fn build_system_prompt(
    persona: &ClientPersona,
    scenario: &ScenarioConfig,
    language: &str,
) -> String {
    let mut prompt = format!(
        "You are roleplaying as {name}, a {role} in a sales simulation.\n\n\
         Background: {background}\n\
         Personality: {personality}\n\
         Goals: {goals}\n\
         Tone: {tone}\n\
         Difficulty: {difficulty}\n\n\
         Scenario: {title}\n\
         Industry: {industry}\n\
         Product: {product}\n\
         Objectives: {objectives}\n",
        name = persona.name,
        role = persona.role,
        background = persona.background,
        personality = persona.personality.join(", "),
        goals = persona.goals.join(", "),
        tone = persona.tone.as_str(),
        difficulty = persona.difficulty.as_str(),
        title = scenario.title,
        industry = scenario.industry,
        product = scenario.product,
        objectives = scenario.objectives.join(", "),
    );

    if let Some(ref custom) = scenario.custom_instructions {
        prompt.push('\n');
        prompt.push_str(custom);
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "\nRespond naturally as this character would. Use objections: {}\n\
         Language: {}\n\
         Keep responses conversational and realistic for a {} level interaction.",
        persona.objections.join(", "),
        language,
        persona.difficulty.as_str(),
    ));

    prompt
}

/// Build the user prompt for the analysis call: scenario framing plus the
/// full conversation, one `role: content` line per message.
pub fn build_analysis_prompt(
    messages: &[ConversationMessage],
    config: &ConversationConfig,
) -> String {
    let conversation = messages
        .iter()
        .map(|msg| format!("{}: {}", msg.role.as_str(), msg.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze this sales conversation and provide detailed feedback:\n\n\
         Scenario: {title}\n\
         Objectives: {objectives}\n\
         Success Criteria: {criteria}\n\n\
         Conversation:\n{conversation}\n\n\
         Evaluate the user's performance on:\n\
         1. Communication (clarity, listening, questioning)\n\
         2. Content (product knowledge, relevance, accuracy)\n\
         3. Tone (professionalism, empathy, confidence)\n\
         4. Persuasion (objection handling, value proposition, closing)\n\n\
         Provide scores (0-100), specific feedback, examples from the \
         conversation, and actionable improvements.",
        title = config.scenario.title,
        objectives = config.scenario.objectives.join(", "),
        criteria = config.scenario.success_criteria.join(", "),
    )
}
