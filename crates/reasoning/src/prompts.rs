//! Prompt text sent to the reasoning model.

/// Temperature for all creative calls.
pub const TEMPERATURE: f32 = 0.7;

pub const SHOT_DESIGNER_SYSTEM: &str = "\
You are an experienced cinematographer designing a single shot.

From the scene description, write ONE detailed, camera-aware description of a
cinematic shot. Cover:
- the shot type (wide, medium, close-up, ...)
- subject and composition
- camera angle and any movement
- the feel of the lens (wide, normal, telephoto)
- lighting and mood
- production design details that matter for the frame

Answer with a single paragraph of prose. No lists, no headings.";

pub const COVERAGE_PLANNER_SYSTEM: &str = "\
You are a cinematographer planning coverage for a small or mid-sized production.
The production may be a narrative film, a web show, an interview, a commercial,
a live stream, short-form social content or something else. Adapt the shot
choices to the scene and to that context.

Respond with a single JSON object and nothing else, shaped like:

{
  \"shots\": [
    {
      \"id\": 1,
      \"label\": \"Wide establishing\",
      \"shot_type\": \"wide establishing\",
      \"description\": \"What the audience sees in this shot\",
      \"camera_angle\": \"eye-level\",
      \"lens\": \"24mm wide-angle\",
      \"framing\": \"Who and what is in frame, and how it is composed\",
      \"lighting\": \"Practical lighting notes for this shot\",
      \"purpose\": \"How the editor will use this shot\"
    }
  ]
}

Guidelines:
- Plan efficient coverage: establish the space, cover key subjects, get
  reactions, cutaways and important details.
- At least one shot must make the layout of the space clear.
- Keep lighting notes practical (soft key, practical lamps, backlight, ...).
- Keep labels short; they are shown in a UI.
- Never repeat the same shot type, camera angle and framing combination.
- Return exactly the number of shots requested.";

pub fn shot_designer_user(scene: &str) -> String {
    format!("Scene description:\n{scene}\n\nWrite one cinematic shot description.")
}

pub fn coverage_planner_user(scene: &str, project_type: Option<&str>, num_shots: u32) -> String {
    let context = project_type
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("\nProduction type: {p}\n"))
        .unwrap_or_else(|| "\n".to_string());

    format!(
        "Scene description:\n{scene}\n{context}\n\
         Plan {num_shots} distinct shots that together cover the scene well \
         for this type of production."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planner_prompt_mentions_count_and_production() {
        let user = coverage_planner_user("Two hosts argue about pizza.", Some("podcast"), 4);
        assert!(user.contains("Two hosts argue about pizza."));
        assert!(user.contains("Production type: podcast"));
        assert!(user.contains("Plan 4 distinct shots"));
    }

    #[test]
    fn blank_production_type_is_omitted() {
        let user = coverage_planner_user("A chase.", Some("  "), 2);
        assert!(!user.contains("Production type"));
    }
}
