// Prompt templates
//
// Every endpoint talks to the runtime through a prompt built here, so the
// fallback policy and the HTTP surface stay consistent about wording. The
// curriculum lookup and web search templates are load-bearing: the lookup
// instructs the agent to emit the CURRICULUM_NOT_FOUND sentinel, and the
// search template carries the mandatory curriculum-note preamble.

use crate::explain::{ConceptQuery, CURRICULUM_NOT_FOUND};

/// Human-readable name for a supported language code. Unknown codes fall
/// back to English.
pub fn language_name(code: &str) -> &'static str {
    match code {
        "en" => "English",
        "hi" => "Hindi",
        "kn" => "Kannada",
        "te" => "Telugu",
        "ta" => "Tamil",
        "ml" => "Malayalam",
        "bn" => "Bengali",
        "gu" => "Gujarati",
        "mr" => "Marathi",
        "pa" => "Punjabi",
        "or" => "Odia",
        "as" => "Assamese",
        "fr" => "French",
        "de" => "German",
        "es" => "Spanish",
        "pt" => "Portuguese",
        "ja" => "Japanese",
        "ko" => "Korean",
        "ar" => "Arabic",
        "ru" => "Russian",
        "zh" => "Chinese",
        _ => "English",
    }
}

/// System prompt wrapping a free-form teacher query for the chat endpoint
pub fn mentor_prompt(language: &str, query: &str) -> String {
    let language_name = language_name(language);
    format!(
        r#"You are Sahayak, an expert educational AI assistant and friendly mentor for teachers.

CRITICAL INSTRUCTION: You MUST respond in {language_name} language only. If the language is not English, ensure your entire response is in {language_name}.

Your role is to:

🎓 **Be a Subject Expert**: Provide accurate, comprehensive knowledge across all subjects (Mathematics, Science, English, Social Studies, etc.)

🤝 **Be a Friendly Mentor**: Always respond in a warm, encouraging, and supportive manner. Use appropriate honorific phrases in {language_name} for addressing teachers respectfully.

💡 **Provide Practical Guidance**: Offer actionable teaching tips, classroom strategies, and real-world examples

📚 **Curriculum-Aware**: Consider the teacher's curriculum (NCERT/KTS) and grade level when providing advice

🎯 **Address Educational Needs**: Help with:
- Lesson planning and curriculum development
- Classroom management and student engagement
- Assessment strategies and evaluation methods
- Subject-specific teaching methodologies
- Student motivation and learning difficulties
- Professional development and teaching resources
- Multi-grade classroom strategies
- Technology integration in education

🌟 **Always Be**:
- Polite, respectful, and encouraging
- Solution-oriented and practical
- Age-appropriate in your suggestions
- Culturally sensitive and inclusive
- Patient and understanding of teaching challenges

LANGUAGE REQUIREMENT: Your entire response must be in {language_name}. Do not mix languages or provide English translations unless specifically requested.

Now, please respond to the teacher's query in {language_name}: {query}"#
    )
}

/// STAGE_CURRICULUM prompt: search the curriculum source, reply with the
/// sentinel when nothing relevant exists.
pub fn curriculum_lookup_prompt(query: &ConceptQuery) -> String {
    let curriculum = query.curriculum_type.to_uppercase();
    format!(
        r#"First, search the {curriculum} curriculum database for Grade {grade} to find information about "{concept}".

IMPORTANT: Please respond in {language} language only.

If you find relevant information in the curriculum:
- Provide a comprehensive summary of what's found
- Include key points, definitions, and examples from the curriculum
- Format it appropriately for Grade {grade} students
- Include page references or chapter information if available
- Respond in {language} language

If NO information is found in the curriculum:
- Respond with "{sentinel}"

Search the curriculum database now."#,
        grade = query.grade,
        concept = query.concept,
        language = query.language,
        sentinel = CURRICULUM_NOT_FOUND,
    )
}

/// STAGE_WEB prompt: open-domain search with the mandatory curriculum-note
/// preamble and grade tailoring.
pub fn web_search_prompt(query: &ConceptQuery) -> String {
    let curriculum = query.curriculum_type.to_uppercase();
    format!(
        r#"Since "{concept}" was not found in the {curriculum} curriculum for Grade {grade}, search the web for information about this concept and provide a grade-appropriate explanation.

IMPORTANT: Please respond in {language} language only.

Requirements:
1. Search for general information about "{concept}"
2. Tailor the explanation specifically for Grade {grade} students
3. Use simple, age-appropriate language
4. Include real-world examples relevant to Grade {grade} students
5. Provide teaching tips for classroom delivery
6. Start your response with: "📚 **Curriculum Note**: The requested topic '{concept}' was not found in Grade {grade} {curriculum} curriculum. Below is a custom explanation tailored for your grade level."
7. Respond entirely in {language} language

Make the explanation engaging and suitable for classroom teaching."#,
        concept = query.concept,
        grade = query.grade,
        language = query.language,
    )
}

/// Deterministic templated explanation used when both retrieval stages fail.
/// No agent call is involved.
pub fn generic_explanation(query: &ConceptQuery) -> String {
    let curriculum = query.curriculum_type.to_uppercase();
    format!(
        r#"I can help explain "{concept}" for Grade {grade} students!

**What is {concept}?**
{concept} is an important concept in education. Let me break it down for you:

**Key Points:**
- This is a fundamental topic that Grade {grade} students should understand
- It connects to other concepts in their curriculum
- Students learn best when they can see real-world examples

**Teaching Tips:**
- Start with simple examples students can relate to
- Use hands-on activities when possible
- Connect to their daily experiences
- Check for understanding with questions

**Next Steps:**
You can find more specific information about {concept} in your Grade {grade} {curriculum} textbooks, or I can help you plan specific activities for teaching this concept.

*Note: This is a general explanation. For curriculum-specific content, please check your textbook or try again.*"#,
        concept = query.concept,
        grade = query.grade,
    )
}

/// Classroom/homework/assessment activity generation
pub fn activities_prompt(concept: &str, grade: u8, activity_type: &str, count: u32) -> String {
    format!(
        "Generate {count} {activity_type} activities for teaching {concept} to Grade {grade} students. \
         Include materials needed, step-by-step instructions, and learning objectives."
    )
}

/// Full lesson plan generation
pub fn lesson_plan_prompt(topic: &str, subject: &str, grade: u8, duration: u32) -> String {
    format!(
        r#"Create a comprehensive {duration}-minute lesson plan for teaching {topic} in {subject} for Grade {grade} students.
Include:
- Learning objectives
- Introduction (5-10 min)
- Main content with activities (20-30 min)
- Assessment methods
- Homework suggestions
- Teaching tips and strategies
Format for easy implementation in classroom."#
    )
}

/// Study material generation for one topic
pub fn study_materials_prompt(topic: &str, subject: &str, grade: u8, material_type: &str) -> String {
    format!(
        r#"Generate {material_type} study material for {topic} in {subject} for Grade {grade}.
Include:
- Key concepts and definitions
- Examples and illustrations
- Important points to remember
- NCERT textbook references
- Additional resources"#
    )
}

/// Year-long curriculum generation across subjects
pub fn curriculum_plan_prompt(
    grade: u8,
    subjects: &[String],
    curriculum_type: &str,
    academic_year: &str,
) -> String {
    format!(
        r#"Generate a comprehensive year-long curriculum for Grade {grade} covering {subjects} for academic year {academic_year}.
Based on {curriculum} guidelines.
Include:
- Monthly planning for each subject
- Chapter breakdown with learning objectives
- Assessment schedule
- Resource requirements
- Integration opportunities between subjects
Format as structured curriculum plan."#,
        subjects = subjects.join(", "),
        curriculum = curriculum_type.to_uppercase(),
    )
}

/// Detailed monthly plan for one subject
pub fn monthly_plan_prompt(subject: &str, grade: u8, month: &str) -> String {
    format!(
        "Create a detailed monthly plan for {subject} in Grade {grade} for {month}. \
         Include weekly breakdown, learning objectives, activities, and assessments."
    )
}

/// Assessment question generation
pub fn assessment_prompt(
    topic: &str,
    grade: u8,
    question_type: &str,
    count: u32,
    difficulty: &str,
) -> String {
    format!(
        r#"Generate {count} {question_type} questions for {topic} suitable for Grade {grade} students.
Difficulty level: {difficulty}
Include:
- Questions with clear instructions
- Correct answers
- Explanation for correct answers
- Learning objectives covered
Format questions for easy use in classroom."#,
        question_type = question_type.to_uppercase(),
    )
}

/// Multi-topic quiz generation
pub fn quiz_prompt(topics: &[String], grade: u8, quiz_type: &str, duration: u32) -> String {
    format!(
        r#"Create a {duration}-minute quiz for Grade {grade} covering {topics}.
Quiz type: {quiz_type}
Include:
- Mix of question types (MCQ, short answer, true/false)
- Instructions for students
- Answer key
- Time allocation per question
- Difficulty distribution"#,
        topics = topics.join(", "),
    )
}

/// Educational image generation
pub fn image_prompt(prompt: &str, style: &str) -> String {
    format!(
        "Educational {style}: {prompt}. Style: {style}, suitable for classroom teaching, clear and informative."
    )
}

/// Educational diagram generation
pub fn diagram_prompt(concept: &str, diagram_type: &str, grade: u8) -> String {
    format!(
        "Generate a {diagram_type} diagram to explain {concept} for Grade {grade} students. \
         Make it educational, clear, and suitable for classroom use."
    )
}

/// Classroom management tips
pub fn classroom_tips_prompt(topic: &str, grade: u8, classroom_size: &str) -> String {
    format!(
        r#"Provide classroom management and teaching tips for teaching {topic} to Grade {grade} students.
Classroom size: {classroom_size}
Include:
- Classroom setup suggestions
- Student engagement strategies
- Time management tips
- Assessment methods
- Common challenges and solutions"#
    )
}

/// Strategies for teaching several grades at once
pub fn multi_grade_prompt(subject: &str, grades: &[u8]) -> String {
    let grades = grades
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"Provide strategies for teaching {subject} to multiple grades ({grades}) simultaneously.
Include:
- Classroom organization
- Activity planning
- Assessment strategies
- Time management
- Student grouping methods"#
    )
}

/// Five-day schedule generation grounded in corpus content
pub fn schedule_prompt(
    curriculum: &str,
    grade: u8,
    subject: &str,
    language: &str,
    working_days: &[String],
) -> String {
    let curriculum = curriculum.to_uppercase();
    format!(
        r#"You are an expert educational content designer and child psychology specialist. Analyze the {curriculum} Grade {grade} {subject} textbook content from the vector database to create a FUN, ENGAGING, and DIGESTIBLE 5-day lesson schedule.

CRITICAL INSTRUCTIONS:
1. First, search and retrieve ALL content from the {curriculum} Grade {grade} {subject} textbook in the vector database
2. Identify TOPICS (not chapters) - focus on learning concepts, skills, and knowledge areas
3. Analyze topic COMPLEXITY and DIFFICULTY LEVEL for Grade {grade} students
4. Distribute content based on TOPIC COMPLEXITY, not page counts:
   - Simple/fun topics: Can cover more in one day
   - Complex/abstract topics: Break into smaller, digestible chunks
   - Interactive topics: Prioritize hands-on activities
5. Make learning ENJOYABLE and INTERESTING for children
6. Each day should build logical progression while maintaining engagement
7. Respond in {language} language

Schedule for these working days: {days}

For EACH DAY, provide this EXACT format:

**DAY 1 - [Date]:**
**Topic:** [Specific topic name from textbook]
**Why this topic today:** [Brief explanation of complexity/reasoning]
**Learning Goals:** [What students will understand/be able to do]
**Fun Activities:** [Engaging, age-appropriate activities from textbook]
**Practice:** [Simple exercises to reinforce learning]
**Assessment:** [Quick, fun way to check understanding]
**Pages/References:** [Specific textbook pages or sections]

**DAY 2 - [Date]:**
[Same format]

[Continue for all 5 days]

IMPORTANT: Base daily content distribution on topic complexity and student engagement, NOT on fixed page counts.

Start by analyzing the vector database content for {subject} Grade {grade} now."#,
        days = working_days.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> ConceptQuery {
        ConceptQuery {
            concept: "Photosynthesis".to_string(),
            grade: 6,
            language: "en".to_string(),
            curriculum_type: "ncert".to_string(),
        }
    }

    #[test]
    fn test_language_name_lookup() {
        assert_eq!(language_name("hi"), "Hindi");
        assert_eq!(language_name("kn"), "Kannada");
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name("xx"), "English");
    }

    #[test]
    fn test_curriculum_lookup_carries_sentinel_instruction() {
        let prompt = curriculum_lookup_prompt(&query());
        assert!(prompt.contains("NCERT"));
        assert!(prompt.contains("Grade 6"));
        assert!(prompt.contains("\"Photosynthesis\""));
        assert!(prompt.contains(CURRICULUM_NOT_FOUND));
    }

    #[test]
    fn test_web_search_carries_curriculum_note_preamble() {
        let prompt = web_search_prompt(&query());
        assert!(prompt.contains("📚 **Curriculum Note**"));
        assert!(prompt.contains("was not found in Grade 6 NCERT curriculum"));
    }

    #[test]
    fn test_generic_explanation_mentions_concept_and_grade() {
        let text = generic_explanation(&query());
        assert!(text.contains("Photosynthesis"));
        assert!(text.contains("Grade 6"));
        assert!(text.contains("NCERT"));
    }

    #[test]
    fn test_mentor_prompt_forces_language() {
        let prompt = mentor_prompt("kn", "How do I teach fractions?");
        assert!(prompt.contains("Kannada"));
        assert!(prompt.contains("How do I teach fractions?"));
    }
}
