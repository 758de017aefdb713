//! Prompt text sent by the probe profiles
//!
//! The changelog prompts carry fixed dummy git data so that runs against
//! different models are directly comparable.

pub const KEY_HELPER_PROMPT: &str = "Say 'API key is working' in one sentence.";

const CHANGELOG_PROMPT: &str = r#"You are a technical changelog generator. Create a changelog entry based on git commits.

REQUIREMENTS:
- Use sections: Added, Changed, Fixed, Removed
- Be concise and technical
- Use backticks for code terms
- No emojis or marketing language

DUMMY GIT DATA:
```
feat: add comprehensive CLI tool for release management
feat: implement Gemini AI changelog generation
fix: project-wide version replacement functionality
feat: add model selection for Gemini API calls
```

Generate a changelog entry for version 0.2.0 with date 2025-09-18."#;

const COMPARISON_SYSTEM_PROMPT: &str = r#"You are a technical changelog generator. Your job is to create a new changelog entry based on git commits and changes.

CRITICAL REQUIREMENTS:
1. Follow the EXACT format of the existing changelog - no emojis, no fluff, pure technical content
2. Use these sections ONLY: Added, Changed, Fixed, Removed
3. Each bullet point starts with "- " (dash + space)
4. Be concise and technical - focus on what changed, not why
5. Use backticks for code/technical terms
6. Date format: YYYY-MM-DD
7. No marketing language, no excitement, just facts

STYLE RULES:
- "Added" = new features, new files, new dependencies
- "Changed" = modifications to existing functionality
- "Fixed" = bug fixes, corrections
- "Removed" = deleted features, files, or functionality
- Use present tense for technical accuracy
- Keep entries short and specific
- Group related changes together

OUTPUT FORMAT:
```
## [VERSION] - DATE
### Added
- Item 1
- Item 2

### Changed
- Item 1

### Fixed
- Item 1

### Removed
- Item 1
```

Only include sections that have changes. If no changes for a section, omit it entirely."#;

const COMPARISON_USER_PROMPT: &str = r#"Create a changelog entry for version 0.2.0 based on these changes:

CURRENT CHANGELOG FORMAT:
```
## [0.1.0] - 2025-09-18
### Added
- Engines and `sideEffects` fields to `package.json`
- Optional `peerDependencies` for drivers; kept `glob` as a runtime dependency

### Changed
- Migrated to Bun
- Migrated to a Turbo monorepo (for future examples and docs)
- Rewrote README without LLM
- Build now via `tsup` (ESM + CJS + DTS)

### Fixed
- Tightened SQLite URL detection with env-specific cache keys
- Vitest mocks (20/20 tests passing)

### Removed
- `execute()` fire function
```

GIT COMMITS:
```
feat: add comprehensive CLI tool for release management
feat: implement Gemini AI changelog generation
fix: project-wide version replacement functionality
feat: add model selection for Gemini API calls
```

GIT DIFF (files changed):
```
A       drizzleasy-cli
M       README.md
M       package.json
A       scripts/test-gemini-models.py
```

Generate ONLY the new changelog entry for version 0.2.0 with today's date (2025-09-18). Match the existing style exactly - no emojis, no marketing language, just technical facts."#;

/// Short changelog prompt used by the model testing suite
pub fn changelog_prompt() -> String {
    CHANGELOG_PROMPT.to_string()
}

/// System and user prompt joined into a single turn
pub fn comparison_prompt() -> String {
    format!("{COMPARISON_SYSTEM_PROMPT}\n\n{COMPARISON_USER_PROMPT}")
}
