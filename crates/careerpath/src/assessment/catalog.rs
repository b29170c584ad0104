use super::definition::{
    AssessmentDefinition, AssessmentSummary, AssessmentVariant, DefinitionError, DomainDefinition,
    QuestionDefinition, RatingScale, SectionDefinition, SectionKind, SubDomainDefinition,
};
use super::domain::{AssessmentId, QuestionId};

pub const CAREER_DISCOVERY: &str = "career-discovery";
pub const CAREER_DISCOVERY_PILOT: &str = "career-discovery-pilot";

/// Registry of the assessment definitions the service can score.
#[derive(Debug, Clone, Default)]
pub struct AssessmentCatalog {
    assessments: Vec<AssessmentDefinition>,
}

impl AssessmentCatalog {
    /// The full career discovery assessment and its pilot variant.
    pub fn standard() -> Self {
        let full = career_discovery();
        let pilot = pilot_of(&full, CAREER_DISCOVERY_PILOT, "Career Discovery (Pilot)");
        Self {
            assessments: vec![full, pilot],
        }
    }

    pub fn from_definitions(
        definitions: Vec<AssessmentDefinition>,
    ) -> Result<Self, DefinitionError> {
        for definition in &definitions {
            definition.validate()?;
        }
        Ok(Self {
            assessments: definitions,
        })
    }

    pub fn get(&self, id: &AssessmentId) -> Option<&AssessmentDefinition> {
        self.assessments.iter().find(|definition| &definition.id == id)
    }

    pub fn definitions(&self) -> &[AssessmentDefinition] {
        &self.assessments
    }

    pub fn summaries(&self) -> Vec<AssessmentSummary> {
        self.assessments
            .iter()
            .map(AssessmentDefinition::summary)
            .collect()
    }
}

/// Derive a reduced variant keeping only questions flagged for the pilot. Sub-domains, domains,
/// and sections left without questions are dropped.
fn pilot_of(full: &AssessmentDefinition, id: &str, title: &str) -> AssessmentDefinition {
    let questions: Vec<QuestionDefinition> = QUESTIONS
        .iter()
        .filter(|seed| seed.pilot)
        .map(QuestionSeed::to_definition)
        .collect();

    let sections = full
        .sections
        .iter()
        .filter_map(|section| {
            let domains: Vec<DomainDefinition> = section
                .domains
                .iter()
                .filter_map(|domain| {
                    let kept: Vec<&QuestionDefinition> = questions
                        .iter()
                        .filter(|question| question.domain == domain.id)
                        .collect();
                    if kept.is_empty() {
                        return None;
                    }
                    let sub_domains = domain
                        .sub_domains
                        .iter()
                        .filter(|sub| {
                            kept.iter()
                                .any(|question| question.sub_domain.as_ref() == Some(&sub.id))
                        })
                        .cloned()
                        .collect();
                    Some(DomainDefinition {
                        sub_domains,
                        ..domain.clone()
                    })
                })
                .collect();

            (!domains.is_empty()).then(|| SectionDefinition {
                domains,
                ..section.clone()
            })
        })
        .collect();

    AssessmentDefinition {
        id: AssessmentId(id.to_string()),
        title: title.to_string(),
        variant: AssessmentVariant::Pilot,
        rating: full.rating,
        sections,
        questions,
    }
}

fn career_discovery() -> AssessmentDefinition {
    AssessmentDefinition {
        id: AssessmentId(CAREER_DISCOVERY.to_string()),
        title: "Career Discovery".to_string(),
        variant: AssessmentVariant::Full,
        rating: RatingScale::LIKERT_FIVE,
        sections: vec![
            personality_section(),
            holland_section(),
            intelligences_section(),
            cognitive_style_section(),
            stress_response_section(),
            skills_section(),
            grit_section(),
        ],
        questions: QUESTIONS.iter().map(QuestionSeed::to_definition).collect(),
    }
}

fn domain(id: &str, name: &str, icon: &str, color: &str) -> DomainDefinition {
    DomainDefinition {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        opposite: None,
        sub_domains: Vec::new(),
    }
}

fn with_facets(mut domain: DomainDefinition, facets: &[(&str, &str)]) -> DomainDefinition {
    domain.sub_domains = facets
        .iter()
        .map(|(id, name)| SubDomainDefinition {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect();
    domain
}

fn pole(id: &str, name: &str, opposite: &str, icon: &str, color: &str) -> DomainDefinition {
    DomainDefinition {
        opposite: Some(opposite.to_string()),
        ..domain(id, name, icon, color)
    }
}

fn section(
    id: &str,
    title: &str,
    kind: SectionKind,
    domains: Vec<DomainDefinition>,
) -> SectionDefinition {
    SectionDefinition {
        id: id.to_string(),
        title: title.to_string(),
        kind,
        domains,
    }
}

fn personality_section() -> SectionDefinition {
    section(
        "personality",
        "Personality",
        SectionKind::LikertSum,
        vec![
            with_facets(
                domain("openness", "Openness", "palette", "#8B5CF6"),
                &[("imagination", "Imagination"), ("curiosity", "Intellectual Curiosity")],
            ),
            with_facets(
                domain("conscientiousness", "Conscientiousness", "clipboard-check", "#0EA5E9"),
                &[("organization", "Organization"), ("diligence", "Diligence")],
            ),
            with_facets(
                domain("extraversion", "Extraversion", "users", "#F59E0B"),
                &[("sociability", "Sociability"), ("assertiveness", "Assertiveness")],
            ),
            with_facets(
                domain("agreeableness", "Agreeableness", "heart-handshake", "#10B981"),
                &[("empathy", "Empathy"), ("cooperation", "Cooperation")],
            ),
            with_facets(
                domain("emotional_stability", "Emotional Stability", "anchor", "#6366F1"),
                &[("calmness", "Calmness"), ("resilience", "Resilience")],
            ),
        ],
    )
}

fn holland_section() -> SectionDefinition {
    section(
        "holland",
        "Career Interests (RIASEC)",
        SectionKind::Composite,
        vec![
            domain("R", "Realistic", "wrench", "#EF4444"),
            domain("I", "Investigative", "microscope", "#3B82F6"),
            domain("A", "Artistic", "brush", "#EC4899"),
            domain("S", "Social", "hand-heart", "#22C55E"),
            domain("E", "Enterprising", "briefcase", "#F97316"),
            domain("C", "Conventional", "table", "#64748B"),
        ],
    )
}

fn intelligences_section() -> SectionDefinition {
    section(
        "intelligences",
        "Multiple Intelligences",
        SectionKind::LikertSum,
        vec![
            domain("linguistic", "Linguistic", "book-open", "#0EA5E9"),
            domain("logical", "Logical-Mathematical", "calculator", "#6366F1"),
            domain("spatial", "Visual-Spatial", "shapes", "#EC4899"),
            domain("musical", "Musical", "music", "#A855F7"),
            domain("bodily", "Bodily-Kinesthetic", "activity", "#F97316"),
            domain("interpersonal", "Interpersonal", "messages-square", "#22C55E"),
            domain("intrapersonal", "Intrapersonal", "compass", "#14B8A6"),
            domain("naturalistic", "Naturalistic", "leaf", "#84CC16"),
        ],
    )
}

fn cognitive_style_section() -> SectionDefinition {
    section(
        "cognitive_style",
        "Cognitive Style",
        SectionKind::Spectrum,
        vec![
            pole("analytical", "Analytical", "Intuitive", "scan-search", "#3B82F6"),
            pole("structured", "Structured", "Flexible", "layout-grid", "#0EA5E9"),
            pole("independent", "Independent", "Collaborative", "user", "#8B5CF6"),
            pole("reflective", "Reflective", "Action-Oriented", "hourglass", "#14B8A6"),
        ],
    )
}

fn stress_response_section() -> SectionDefinition {
    section(
        "stress_response",
        "Stress Response",
        SectionKind::LikertSum,
        vec![
            domain("emotional_regulation", "Emotional Regulation", "thermometer", "#6366F1"),
            domain("active_coping", "Active Coping", "target", "#F59E0B"),
            domain("support_seeking", "Support Seeking", "life-buoy", "#22C55E"),
        ],
    )
}

fn skills_section() -> SectionDefinition {
    section(
        "skills",
        "Skills",
        SectionKind::LikertSum,
        vec![
            domain("communication", "Communication", "megaphone", "#0EA5E9"),
            domain("teamwork", "Teamwork", "users-round", "#22C55E"),
            domain("critical_thinking", "Critical Thinking", "brain", "#8B5CF6"),
            domain("digital_literacy", "Digital Literacy", "laptop", "#3B82F6"),
            domain("leadership", "Leadership", "flag", "#F97316"),
            domain("time_management", "Time Management", "clock", "#64748B"),
        ],
    )
}

fn grit_section() -> SectionDefinition {
    section(
        "grit",
        "Grit",
        SectionKind::LikertSum,
        vec![
            domain("perseverance", "Perseverance of Effort", "mountain", "#EF4444"),
            domain("consistency", "Consistency of Interest", "repeat", "#F59E0B"),
        ],
    )
}

struct QuestionSeed {
    id: &'static str,
    domain: &'static str,
    sub_domain: Option<&'static str>,
    reverse: bool,
    pilot: bool,
    prompt: &'static str,
}

impl QuestionSeed {
    const fn facet(mut self, sub_domain: &'static str) -> Self {
        self.sub_domain = Some(sub_domain);
        self
    }

    const fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    const fn pilot(mut self) -> Self {
        self.pilot = true;
        self
    }

    fn to_definition(&self) -> QuestionDefinition {
        QuestionDefinition {
            id: QuestionId::new(self.id),
            domain: self.domain.to_string(),
            sub_domain: self.sub_domain.map(str::to_string),
            reverse: self.reverse,
            prompt: self.prompt.to_string(),
        }
    }
}

const fn q(id: &'static str, domain: &'static str, prompt: &'static str) -> QuestionSeed {
    QuestionSeed {
        id,
        domain,
        sub_domain: None,
        reverse: false,
        pilot: false,
        prompt,
    }
}

#[rustfmt::skip]
static QUESTIONS: &[QuestionSeed] = &[
    // personality
    q("per-o-1", "openness", "I often imagine how things could be done differently.")
        .facet("imagination").pilot(),
    q("per-o-2", "openness", "I rarely daydream or picture new possibilities.")
        .facet("imagination").reversed(),
    q("per-o-3", "openness", "I enjoy exploring ideas just to understand them better.")
        .facet("curiosity").pilot(),
    q("per-o-4", "openness", "I seek out topics that I know nothing about.").facet("curiosity"),
    q("per-c-1", "conscientiousness", "I keep my study space and materials organized.")
        .facet("organization").pilot(),
    q("per-c-2", "conscientiousness", "I often lose track of where I put things.")
        .facet("organization").reversed(),
    q("per-c-3", "conscientiousness", "I finish assignments even when they become tedious.")
        .facet("diligence").pilot(),
    q("per-c-4", "conscientiousness", "I set high standards for the quality of my work.")
        .facet("diligence"),
    q("per-e-1", "extraversion", "I feel energized after spending time with a group.")
        .facet("sociability").pilot(),
    q("per-e-2", "extraversion", "I prefer to stay in the background at social events.")
        .facet("sociability").reversed(),
    q("per-e-3", "extraversion", "I am comfortable speaking up in class discussions.")
        .facet("assertiveness").pilot(),
    q("per-e-4", "extraversion", "I naturally take charge when a group needs direction.")
        .facet("assertiveness"),
    q("per-a-1", "agreeableness", "I can tell how others are feeling without them saying it.")
        .facet("empathy").pilot(),
    q("per-a-2", "agreeableness", "I go out of my way to help classmates who are struggling.")
        .facet("empathy"),
    q("per-a-3", "agreeableness", "I look for compromises when people disagree.")
        .facet("cooperation").pilot(),
    q("per-a-4", "agreeableness",
        "I find it hard to work with people whose views differ from mine.")
        .facet("cooperation").reversed(),
    q("per-n-1", "emotional_stability", "I stay calm before important exams.")
        .facet("calmness").pilot(),
    q("per-n-2", "emotional_stability", "Small setbacks can ruin my whole day.")
        .facet("calmness").reversed(),
    q("per-n-3", "emotional_stability", "I recover quickly after a disappointment.")
        .facet("resilience").pilot(),
    q("per-n-4", "emotional_stability", "I can keep going when things do not go my way.")
        .facet("resilience"),
    // holland
    q("hol-r-1", "R", "I enjoy fixing or assembling things with my hands.").pilot(),
    q("hol-r-2", "R", "I would like a job that involves working outdoors."),
    q("hol-r-3", "R", "I like operating tools, machines, or equipment.").pilot(),
    q("hol-r-4", "R", "I prefer practical tasks with visible results."),
    q("hol-r-5", "R", "I enjoy building models or working on engines."),
    q("hol-i-1", "I", "I like solving complex math or science problems.").pilot(),
    q("hol-i-2", "I", "I enjoy running experiments to test an idea."),
    q("hol-i-3", "I", "I want to understand why things work the way they do.").pilot(),
    q("hol-i-4", "I", "I enjoy reading about scientific discoveries."),
    q("hol-i-5", "I", "I like analyzing data to find patterns."),
    q("hol-a-1", "A", "I enjoy drawing, painting, or designing things.").pilot(),
    q("hol-a-2", "A", "I like writing stories, poems, or songs."),
    q("hol-a-3", "A", "I want a career where I can express my creativity.").pilot(),
    q("hol-a-4", "A", "I enjoy performing in music, drama, or dance."),
    q("hol-a-5", "A", "I notice design details that others miss."),
    q("hol-s-1", "S", "I enjoy teaching or explaining things to others.").pilot(),
    q("hol-s-2", "S", "I like helping people solve personal problems."),
    q("hol-s-3", "S", "I would enjoy a career caring for others.").pilot(),
    q("hol-s-4", "S", "I volunteer for community or school service."),
    q("hol-s-5", "S", "I like working in teams toward a shared goal."),
    q("hol-e-1", "E", "I enjoy persuading people to see my point of view.").pilot(),
    q("hol-e-2", "E", "I would like to start my own business someday."),
    q("hol-e-3", "E", "I like leading projects and making decisions.").pilot(),
    q("hol-e-4", "E", "I enjoy selling products or pitching ideas."),
    q("hol-e-5", "E", "I am drawn to competitive environments."),
    q("hol-c-1", "C", "I like keeping accurate records and lists.").pilot(),
    q("hol-c-2", "C", "I enjoy working with numbers in spreadsheets."),
    q("hol-c-3", "C", "I prefer tasks with clear procedures to follow.").pilot(),
    q("hol-c-4", "C", "I like checking work carefully for errors."),
    q("hol-c-5", "C", "I enjoy organizing files, data, or schedules."),
    // intelligences
    q("mi-lin-1", "linguistic", "I express my ideas clearly in writing."),
    q("mi-lin-2", "linguistic", "I enjoy word games, debates, or reading."),
    q("mi-log-1", "logical", "I can easily spot flaws in an argument."),
    q("mi-log-2", "logical", "I enjoy puzzles that require step-by-step reasoning."),
    q("mi-spa-1", "spatial", "I can picture objects from different angles in my mind."),
    q("mi-spa-2", "spatial", "I find maps and diagrams easy to read."),
    q("mi-mus-1", "musical", "I can recognize when a note is off key."),
    q("mi-mus-2", "musical", "I remember things better when they are set to rhythm."),
    q("mi-bod-1", "bodily", "I learn best by doing things physically."),
    q("mi-bod-2", "bodily", "I am well coordinated in sports or dance."),
    q("mi-inter-1", "interpersonal", "Friends often come to me for advice."),
    q("mi-inter-2", "interpersonal", "I can sense the mood of a group quickly."),
    q("mi-intra-1", "intrapersonal", "I understand my own strengths and weaknesses."),
    q("mi-intra-2", "intrapersonal", "I regularly reflect on my goals."),
    q("mi-nat-1", "naturalistic", "I enjoy identifying plants, animals, or rocks."),
    q("mi-nat-2", "naturalistic", "I notice changes in nature and the environment."),
    // cognitive style
    q("cog-an-1", "analytical", "I break problems into smaller parts before solving them.").pilot(),
    q("cog-an-2", "analytical", "I trust my gut feeling more than a detailed analysis.")
        .reversed().pilot(),
    q("cog-an-3", "analytical", "I want evidence before I accept a conclusion."),
    q("cog-st-1", "structured", "I like to plan my work before I start.").pilot(),
    q("cog-st-2", "structured", "I prefer to keep my options open rather than follow a plan.")
        .reversed().pilot(),
    q("cog-st-3", "structured", "Clear deadlines help me do my best work."),
    q("cog-in-1", "independent", "I do my best thinking when working alone.").pilot(),
    q("cog-in-2", "independent", "I learn more by discussing ideas with others.")
        .reversed().pilot(),
    q("cog-in-3", "independent", "I prefer to make decisions without asking for input."),
    q("cog-re-1", "reflective", "I think things through carefully before acting.").pilot(),
    q("cog-re-2", "reflective", "I would rather try something than keep thinking about it.")
        .reversed().pilot(),
    q("cog-re-3", "reflective", "I review what went well and what did not after a task."),
    // stress response
    q("str-er-1", "emotional_regulation", "I can calm myself down when I feel overwhelmed."),
    q("str-er-2", "emotional_regulation", "I lose my temper when I am under pressure.").reversed(),
    q("str-er-3", "emotional_regulation", "I notice my stress before it affects my work."),
    q("str-ac-1", "active_coping", "When stressed, I make a plan to deal with the problem."),
    q("str-ac-2", "active_coping", "I tackle difficult tasks instead of putting them off."),
    q("str-ac-3", "active_coping", "I break big worries into steps I can act on."),
    q("str-ss-1", "support_seeking", "I talk to someone I trust when I am struggling."),
    q("str-ss-2", "support_seeking", "I ask teachers for help when I fall behind."),
    q("str-ss-3", "support_seeking",
        "I prefer to handle problems alone, even when they are serious.")
        .reversed(),
    // skills
    q("sk-com-1", "communication", "I can explain complex ideas in simple terms.").pilot(),
    q("sk-com-2", "communication", "I listen carefully before responding."),
    q("sk-team-1", "teamwork", "I contribute my fair share in group projects.").pilot(),
    q("sk-team-2", "teamwork", "I help resolve conflicts within a team."),
    q("sk-ct-1", "critical_thinking", "I evaluate sources before trusting information.").pilot(),
    q("sk-ct-2", "critical_thinking", "I consider several solutions before choosing one."),
    q("sk-dig-1", "digital_literacy", "I quickly learn to use new software or apps.").pilot(),
    q("sk-dig-2", "digital_literacy", "I can find reliable information online efficiently."),
    q("sk-lead-1", "leadership", "Others look to me to organize group activities.").pilot(),
    q("sk-lead-2", "leadership", "I motivate others to do their best."),
    q("sk-tm-1", "time_management", "I meet deadlines without last-minute rushing.").pilot(),
    q("sk-tm-2", "time_management", "I prioritize tasks by importance."),
    // grit
    q("grit-p-1", "perseverance", "I finish whatever I begin.").pilot(),
    q("grit-p-2", "perseverance", "Setbacks do not discourage me.").pilot(),
    q("grit-p-3", "perseverance", "I give up when tasks become too hard.").reversed(),
    q("grit-c-1", "consistency", "I stay interested in my goals over many months.").pilot(),
    q("grit-c-2", "consistency", "New ideas and projects often distract me from old ones.")
        .reversed().pilot(),
    q("grit-c-3", "consistency", "I often set a goal but later choose to pursue a different one.")
        .reversed(),
];
