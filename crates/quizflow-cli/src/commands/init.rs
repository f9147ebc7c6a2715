//! The `quizflow init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    std::fs::create_dir_all("questionnaires")?;
    let example_path = std::path::Path::new("questionnaires/stress-check.toml");
    if example_path.exists() {
        println!("questionnaires/stress-check.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_DEFINITION)?;
        println!("Created questionnaires/stress-check.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizflow validate --definition questionnaires/stress-check.toml");
    println!("  2. Run: quizflow run --definition questionnaires/stress-check.toml");
    println!("  3. Run: quizflow history");

    Ok(())
}

const EXAMPLE_DEFINITION: &str = r##"[questionnaire]
id = "stress-check"
title = "Stress & Recovery Check"
description = "An adaptive stress questionnaire that branches on your answers and adjusts for age and gender."
version = "1.0.0"
category = "wellbeing"
tags = ["stress", "burnout", "recovery"]
estimated_minutes = 10

[[initial_questions]]
id = "general_stress"
type = "scale"
prompt = "How would you rate your overall stress level over the last month?"

[initial_questions.scale]
min = 1
max = 10

[initial_questions.scale.labels]
1 = "Very low"
10 = "Critically high"

[[initial_questions.conditions]]
name = "low_stress"
max = 3
next_flow = "low_stress_flow"

[[initial_questions.conditions]]
name = "moderate_stress"
min = 4
max = 6
next_flow = "moderate_stress_flow"

[[initial_questions.conditions]]
name = "high_stress"
min = 7
next_flow = "high_stress_flow"

[[question_flows.low_stress_flow]]
id = "energy_level"
type = "single"
prompt = "How is your energy through the day?"

[[question_flows.low_stress_flow.options]]
value = "high"
label = "High, I feel energetic"
weight = 0

[[question_flows.low_stress_flow.options]]
value = "stable"
label = "Stable, no sharp dips"
weight = 1

[[question_flows.low_stress_flow.options]]
value = "variable"
label = "Variable, with occasional dips"
weight = 2

[[question_flows.low_stress_flow.options]]
value = "low"
label = "Low, I am often tired"
weight = 3

[[question_flows.low_stress_flow]]
id = "sleep_quality"
type = "single"
prompt = "How have you been sleeping lately?"

[[question_flows.low_stress_flow.options]]
value = "excellent"
label = "Very well, fully rested"
weight = 0

[[question_flows.low_stress_flow.options]]
value = "good"
label = "Well, waking occasionally"
weight = 1

[[question_flows.low_stress_flow.options]]
value = "poor"
label = "Poorly, hard to fall asleep"
weight = 3

[[question_flows.low_stress_flow.options]]
value = "very_poor"
label = "Very poorly, persistent insomnia"
weight = 4

[[question_flows.moderate_stress_flow]]
id = "stress_sources"
type = "multiple"
prompt = "What are the main sources of stress in your life? (select all that apply)"

[[question_flows.moderate_stress_flow.options]]
value = "work"
label = "Work or study"
weight = 2

[[question_flows.moderate_stress_flow.options]]
value = "relationships"
label = "Relationships"
weight = 2

[[question_flows.moderate_stress_flow.options]]
value = "finances"
label = "Financial worries"
weight = 3

[[question_flows.moderate_stress_flow.options]]
value = "health"
label = "Health concerns"
weight = 3

[[question_flows.moderate_stress_flow.options]]
value = "future"
label = "Uncertainty about the future"
weight = 2

[[question_flows.moderate_stress_flow]]
id = "coping_strategies"
type = "single"
prompt = "How do you most often cope with stress?"

[[question_flows.moderate_stress_flow.options]]
value = "active"
label = "Sport, walks, active rest"
weight = -2

[[question_flows.moderate_stress_flow.options]]
value = "calm"
label = "Meditation, reading, music"
weight = -1

[[question_flows.moderate_stress_flow.options]]
value = "social"
label = "Time with friends and family"
weight = -1

[[question_flows.moderate_stress_flow.options]]
value = "avoidance"
label = "Avoiding problems, putting things off"
weight = 2

[[question_flows.moderate_stress_flow.options]]
value = "unhealthy"
label = "Alcohol, overeating, smoking"
weight = 4

[[question_flows.high_stress_flow]]
id = "stress_duration"
type = "single"
prompt = "How long have you been under elevated stress?"

[[question_flows.high_stress_flow.options]]
value = "days"
label = "The last few days"
weight = 2

[[question_flows.high_stress_flow.options]]
value = "weeks"
label = "The last few weeks"
weight = 3

[[question_flows.high_stress_flow.options]]
value = "months"
label = "Several months"
weight = 4

[[question_flows.high_stress_flow.options]]
value = "years"
label = "More than a year"
weight = 5

[[question_flows.high_stress_flow]]
id = "emotional_symptoms"
type = "multiple"
prompt = "Which emotional symptoms do you experience? (select all that apply)"

[[question_flows.high_stress_flow.options]]
value = "anxiety"
label = "Anxiety, restlessness"
weight = 3

[[question_flows.high_stress_flow.options]]
value = "irritability"
label = "Irritability, short temper"
weight = 3

[[question_flows.high_stress_flow.options]]
value = "overwhelm"
label = "Feeling overwhelmed"
weight = 4

[[question_flows.high_stress_flow.options]]
value = "hopelessness"
label = "Hopelessness"
weight = 5

[[question_flows.high_stress_flow]]
id = "concentration"
type = "scale"
prompt = "How much does stress affect your ability to concentrate?"

[question_flows.high_stress_flow.scale]
min = 1
max = 10

[question_flows.high_stress_flow.scale.labels]
1 = "Not at all"
10 = "Completely"

[scoring.modifiers.age."18-25"]
multiplier = 0.9
note = "younger years often come with adaptation stress"

[scoring.modifiers.age."26-35"]
multiplier = 1.1
note = "a period of active career growth and family building"

[scoring.modifiers.age."36-45"]
multiplier = 1.2
note = "the peak period of life demands"

[scoring.modifiers.age."46-55"]
multiplier = 1.0
note = "a period of rethinking priorities"

[scoring.modifiers.age."56+"]
multiplier = 0.8
note = "a more settled stage of life"

[scoring.modifiers.gender.female]
multiplier = 1.1
note = "emotional strain is reported more often in this group"

[scoring.modifiers.gender.male]
multiplier = 0.95
note = "strain is acknowledged less often here, while work burnout is more common"

[scoring.modifiers.gender.other]
multiplier = 1.15
note = "additional social stressors may apply"

[[tiers]]
level = "minimal"
min = 0
label = "Minimal stress level"
color = "#10b981"
description = "Stress is within a healthy range; current coping is working."
recommendations = [
    "Keep up the habits that are working",
    "Maintain social connections",
    "Build stress resilience as prevention",
]

[[tiers]]
level = "mild"
min = 13
label = "Mild stress level"
color = "#f59e0b"
description = "Some signs of stress are present but not yet critical."
recommendations = [
    "Learn relaxation techniques such as breathing exercises",
    "Go to bed at a consistent time",
    "Add regular physical exercise to your routine",
]

[[tiers]]
level = "moderate"
min = 26
label = "Moderate stress level"
color = "#ea580c"
description = "Stress is starting to affect daily life; active measures are advisable."
recommendations = [
    "Consider reducing or redistributing your workload",
    "Lean on people close to you for support",
    "Keep a stress diary to identify triggers",
    "Consider a consultation with a psychologist",
]

[[tiers]]
level = "high"
min = 41
label = "High stress level"
color = "#dc2626"
description = "A significant stress load that needs prompt attention."
recommendations = [
    "Talk to a psychologist or psychotherapist",
    "Consider temporarily reducing your workload",
    "Avoid major life decisions while under this load",
    "Build a supportive environment at home and at work",
]

[[tiers]]
level = "critical"
min = 56
label = "Critical stress level"
color = "#991b1b"
description = "A critically high stress load; professional support is strongly advised."
recommendations = [
    "Contact a specialist as the first priority",
    "Consider time off or sick leave",
    "Activate every source of social support available",
    "Do not stay alone with these problems",
]
"##;
