//! Prompt templates for the Gemini collaborators.

use minijinja::{Environment, context};
use studio_core::error::{Result, StudioError};
use studio_core::generation::ConceptRequest;

const SYSTEM_TEMPLATE: &str = r#"You are a private-channel copywriting assistant for a rice wine lifestyle brand.

[Voice]
You write as one person who blends the brand founder's expertise with the user's own identity.
User identity: {{ identity }} (traits: {{ traits | join("、") }}). Background: {{ background }}.

[Task]
Perspective: {% if personal %}personal (real person, emotional resonance; the wine may not appear at all){% else %}brand (rice wine aesthetics, expert sharing){% endif %}.
Rules:
1. {% if personal %}No sales talk, lead with empathy.{% else %}No lecturing, lead with generosity.{% endif %}
2. No flawless persona; small slips and setbacks bring people closer.
3. Set the scene: {% if personal %}a real moment from the founder's own life.{% else %}a lovely moment of drinking rice wine.{% endif %}
4. Tone: warm, sincere and gentle, like a message to an old friend.

[Category]
{{ guideline }}

[Output]
Write 2-3 distinct drafts. Each draft has a version label, the copy, a concrete photo suggestion (an English prompt) and a script for the comment section."#;

const USER_TEMPLATE: &str = r#"[Scenario] {{ scenario }}
{%- if references %}
[Past references]
{%- for reference in references %}
Reference {{ loop.index }}: {{ reference }}
{%- endfor %}
{%- endif %}
{%- if selling_points %}
[Selling points]
{%- for point in selling_points %}
- {{ point }}
{%- endfor %}
{%- endif %}"#;

const IMAGE_TEMPLATE: &str = "Authentic photography style. Soft natural lighting, film grain texture, high-end but warm domestic atmosphere, candid shot. Detailed content: {{ prompt }}";

fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template("system_instruction", SYSTEM_TEMPLATE)
        .map_err(template_error)?;
    env.add_template("concept_prompt", USER_TEMPLATE)
        .map_err(template_error)?;
    env.add_template("image_prompt", IMAGE_TEMPLATE)
        .map_err(template_error)?;
    Ok(env)
}

fn template_error(err: minijinja::Error) -> StudioError {
    StudioError::internal(format!("Prompt template error: {err}"))
}

fn render(name: &str, ctx: minijinja::Value) -> Result<String> {
    environment()?
        .get_template(name)
        .and_then(|template| template.render(ctx))
        .map_err(template_error)
}

/// System instruction: persona, perspective and category guideline.
pub fn system_instruction(request: &ConceptRequest) -> Result<String> {
    let persona = &request.persona;
    render(
        "system_instruction",
        context! {
            identity => persona.identity,
            traits => persona.traits,
            background => persona.background,
            personal => request.category.is_personal(),
            guideline => request.category.guideline(),
        },
    )
}

/// User prompt: scenario, past references and selling points.
pub fn concept_prompt(request: &ConceptRequest) -> Result<String> {
    let references: Vec<&str> = request
        .context_items
        .iter()
        .map(|item| item.copy_text.as_str())
        .collect();
    let selling_points: Vec<&str> = request
        .selling_points
        .iter()
        .map(|point| point.text.as_str())
        .collect();
    render(
        "concept_prompt",
        context! {
            scenario => request.scenario_text,
            references => references,
            selling_points => selling_points,
        },
    )
}

/// Image prompt wrapped in the house photographic style.
pub fn image_prompt(prompt: &str) -> Result<String> {
    render("image_prompt", context! { prompt => prompt })
}
