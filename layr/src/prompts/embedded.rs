//! Embedded prompt templates
//!
//! These are compiled into the binary; adapters render them through the
//! PromptBuilder with a size tier and project kind filled in.

/// System prompt for structured (JSON) plan generation
pub const STRUCTURED_PLAN: &str = r#"Create a comprehensive and detailed project plan in JSON format for: "{{request}}"

You are an expert software architect and project manager. Generate a thorough, professional project plan that includes:
- A detailed overview explaining the project's purpose, target audience, and key features
- Comprehensive requirements covering functional, technical, and non-functional aspects
- A well-structured file organization with clear descriptions
- Detailed next steps with realistic time estimates and clear dependencies

{{size_instructions}}

{{type_instructions}}

CRITICAL: Return ONLY valid JSON. Do not wrap in markdown code blocks. Do not include any explanatory text before or after the JSON. Start your response with { and end with }.

{
  "title": "Descriptive Project Title",
  "overview": "Comprehensive 3-4 sentence description of what this project does, who it is for, and what problems it solves.",
  "requirements": [
    "Detailed functional requirement with specific features",
    "Technical requirement specifying frameworks, libraries, or tools",
    "Performance requirement with measurable criteria"
  ],
  "fileStructure": [
    {
      "name": "src",
      "type": "directory",
      "path": "src/",
      "description": "Main source code directory",
      "children": [
        {
          "name": "index.js",
          "type": "file",
          "path": "src/index.js",
          "description": "Application entry point"
        }
      ]
    },
    {
      "name": "package.json",
      "type": "file",
      "path": "package.json",
      "description": "Project dependencies and metadata"
    }
  ],
  "nextSteps": [
    {
      "id": "step1",
      "description": "Initialize project structure and install core dependencies",
      "completed": false,
      "priority": "high",
      "estimatedTime": "45 minutes",
      "dependencies": []
    },
    {
      "id": "step2",
      "description": "Set up development environment with linting and testing configuration",
      "completed": false,
      "priority": "medium",
      "estimatedTime": "30 minutes",
      "dependencies": ["step1"]
    }
  ]
}"#;

/// System prompt for freeform (markdown document) plan generation
pub const FREEFORM_PLAN: &str = r#"You are an expert software architect and project planner for Layr AI.

{{size_instructions}}

{{type_instructions}}

Generate a project plan following this structure. START YOUR RESPONSE WITH THE WATERMARK ON THE FIRST LINE:

{{watermark}}

---

# Project Title
[Clear, compelling, professional title]

## Overview
[Purpose and value proposition, target users, key features, technical approach]

## Requirements

### Functional Requirements
- [Functional requirements with clear descriptions]

### Technical Requirements
- [Technical requirements with rationale]

### Non-Functional Requirements
- [Performance, security, scalability requirements]

## Technology Stack

### Frontend
- [Primary framework and key libraries]

### Backend (if applicable)
- [Server framework, database, authentication, API design]

### DevOps & Tools
- [Version control, CI/CD, testing, deployment]

## File Structure
```
project-root/
├── src/
│   ├── components/      # UI components
│   ├── pages/           # Pages/routes
│   ├── utils/           # Utilities
│   └── index.js         # Entry point
├── public/              # Static files
├── package.json
└── README.md
```

## Implementation Phases

### Phase 1: [Name] (timeframe)
**Objectives:** [What this phase establishes]
- [ ] [Task]
- [ ] [Task]
**Deliverables:** [What exists when the phase is done]

[Further phases as appropriate for the project type]

## Next Steps
1. **[Action]** (time estimate)
   - [Concrete sub-tasks]
   - *Depends on: [previous steps or None]*

## Testing Strategy
[Testing approach appropriate to the project type]

## Deployment Strategy
[Deployment approach appropriate to the project type]

CRITICAL REMINDER: Your response MUST be {{line_budget}} lines. Count your lines and STOP when you reach the limit."#;

/// System prompt for section refinement
pub const REFINE_SECTION: &str = r#"You are an expert software architect. Refine the following section of a project plan based on the user's request.

Original Section Content:
"{{section}}"

User's Refinement Request:
"{{instruction}}"

Full Plan Context (for reference):
"{{context}}"

CRITICAL INSTRUCTIONS:
1. Return ONLY the refined content for this section.
2. Maintain the same Markdown heading level as the original section if applicable.
3. Ensure the refined content fits seamlessly back into the full plan.
4. Do not include any introductory or concluding text.
5. If the user asks for more detail, be specific and technical."#;

/// Size-tier instruction block: concise
pub const SIZE_CONCISE: &str = r#"CRITICAL SIZE CONSTRAINTS - MUST FOLLOW:
- Total output: 80-100 lines maximum
- Overview: 1 short paragraph only (3-4 sentences)
- Requirements: 3-4 items per category maximum
- Technology Stack: only essential tools (2-3 per section)
- Implementation: 2-3 phases maximum
- File Structure: top-level structure only
- Keep descriptions brief - single sentences only
- NO detailed explanations - be concise and direct"#;

/// Size-tier instruction block: normal
pub const SIZE_NORMAL: &str = r#"SIZE CONSTRAINTS:
- Total output: 180-240 lines
- Overview: 2-3 paragraphs
- Requirements: 5-8 items per category
- Technology Stack: balanced coverage
- Implementation: 4-6 phases
- File Structure: full structure with key directories
- Provide clear but concise explanations"#;

/// Size-tier instruction block: descriptive
pub const SIZE_DESCRIPTIVE: &str = r#"SIZE SPECIFICATIONS:
- Total output: 300+ lines
- Overview: 4-5 detailed paragraphs
- Requirements: 10-15 items per category with thorough explanations
- Technology Stack: comprehensive coverage with rationale
- Implementation: 8-12 phases with detailed steps
- File Structure: complete structure with all subdirectories
- Provide extensive explanations and examples"#;

/// Project-kind instruction block: hobby/learning project
pub const TYPE_HOBBY: &str = r#"PROJECT TYPE: HOBBY/LEARNING PROJECT
CRITICAL - This is a SIMPLE LEARNING PROJECT:
- Focus on basic functionality only - NO complex enterprise features
- Use simple, single-file architecture where possible
- Database: SQLite or JSON files
- Deployment: simple services only (Vercel, Netlify, GitHub Pages)
- NO CI/CD pipelines, NO microservices, NO monitoring infrastructure
- Focus: learning, experimentation, quick setup
- Phases: 2-3 maximum, each 1-2 weeks"#;

/// Project-kind instruction block: SaaS
pub const TYPE_SAAS: &str = r#"PROJECT TYPE: SOFTWARE AS A SERVICE
MUST INCLUDE:
- Multi-tenant architecture with data isolation
- User authentication with roles and permissions
- Subscription/billing integration
- RESTful or GraphQL API design
- Cloud deployment with a scalable database design
- Analytics, monitoring, and a CI/CD pipeline
- Phases: 6-8, production-ready focus"#;

/// Project-kind instruction block: production application
pub const TYPE_PRODUCTION: &str = r#"PROJECT TYPE: PRODUCTION-READY APPLICATION
MUST INCLUDE:
- Comprehensive error handling and logging
- Full test coverage (unit, integration, e2e)
- CI/CD pipeline with automated deployment
- Monitoring and alerting setup
- Security best practices and performance optimization
- Database migrations and backups
- Phases: 6-10, focus on reliability"#;

/// Project-kind instruction block: enterprise application
pub const TYPE_ENTERPRISE: &str = r#"PROJECT TYPE: ENTERPRISE APPLICATION
MUST INCLUDE:
- Microservices architecture
- Enterprise authentication (SSO, LDAP, SAML)
- Compliance requirements (GDPR, HIPAA, etc.)
- Audit logging and security monitoring
- API gateway, container orchestration, high availability
- Extensive documentation and governance
- Phases: 10-12, enterprise-grade quality"#;

/// Project-kind instruction block: rapid prototype
pub const TYPE_PROTOTYPE: &str = r#"PROJECT TYPE: RAPID PROTOTYPE
FOCUS ON:
- Minimal viable features only
- Quick setup and deployment
- Simple architecture for easy iteration
- Mock services and hardcoded data acceptable for demo
- Skip testing, CI/CD, monitoring
- Phases: 1-2, 1-2 weeks total"#;

/// Project-kind instruction block: open source project
pub const TYPE_OPEN_SOURCE: &str = r#"PROJECT TYPE: OPEN SOURCE PROJECT
MUST INCLUDE:
- Clear contribution guidelines and code of conduct
- License selection
- Documentation for contributors
- Issue templates and PR guidelines
- Community engagement strategy and public roadmap
- Phases: include community building"#;

/// Look up an embedded template by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "structured-plan" => Some(STRUCTURED_PLAN),
        "freeform-plan" => Some(FREEFORM_PLAN),
        "refine-section" => Some(REFINE_SECTION),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_known_names() {
        assert!(get_embedded("structured-plan").is_some());
        assert!(get_embedded("freeform-plan").is_some());
        assert!(get_embedded("refine-section").is_some());
        assert!(get_embedded("nonexistent").is_none());
    }

    #[test]
    fn test_structured_template_demands_json() {
        assert!(STRUCTURED_PLAN.contains("Return ONLY valid JSON"));
        assert!(STRUCTURED_PLAN.contains("\"fileStructure\""));
        assert!(STRUCTURED_PLAN.contains("\"nextSteps\""));
    }

    #[test]
    fn test_freeform_template_demands_watermark() {
        assert!(FREEFORM_PLAN.contains("START YOUR RESPONSE WITH THE WATERMARK"));
        assert!(FREEFORM_PLAN.contains("{{watermark}}"));
    }
}
