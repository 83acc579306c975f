//! Placeholder plan content injected when a producer omits its primary payload.

use serde_json::{json, Value as JsonValue};

use crate::models::domain::Domain;
use crate::models::proposal::JsonMap;

pub fn default_content(domain: Domain) -> JsonMap {
    let value = match domain {
        Domain::Fitness => default_workout_plan(),
        Domain::Nutrition => default_meal_plan(),
        Domain::Sleep => default_sleep_recommendations(),
        Domain::MentalWellness => default_wellness_recommendations(),
    };

    match value {
        JsonValue::Object(map) => map,
        _ => JsonMap::new(),
    }
}

fn default_workout_plan() -> JsonValue {
    json!({
        "focus": "balanced_strength",
        "intensity": "moderate",
        "sessions": [
            {"day": "Monday", "type": "Upper Body", "duration": 45, "exercises": [
                {"name": "Push-ups", "sets": 3, "reps": 12},
                {"name": "Dumbbell Rows", "sets": 3, "reps": 10},
                {"name": "Shoulder Press", "sets": 3, "reps": 10}
            ]},
            {"day": "Wednesday", "type": "Lower Body", "duration": 45, "exercises": [
                {"name": "Squats", "sets": 4, "reps": 12},
                {"name": "Lunges", "sets": 3, "reps": 10},
                {"name": "Glute Bridges", "sets": 3, "reps": 15}
            ]},
            {"day": "Friday", "type": "Full Body", "duration": 40, "exercises": [
                {"name": "Burpees", "sets": 3, "reps": 8},
                {"name": "Mountain Climbers", "sets": 3, "reps": 20},
                {"name": "Plank", "sets": 3, "reps": "30s hold"}
            ]}
        ],
        "weekly_volume": "130 minutes",
        "progression": "Increase reps by 2 each week"
    })
}

fn default_meal_plan() -> JsonValue {
    json!({
        "focus": "balanced_nutrition",
        "daily_calories": 2200,
        "macro_split": {"protein": "30%", "carbs": "45%", "fats": "25%"},
        "meals": [
            {"meal": "Breakfast", "time": "7:30 AM", "items": ["Oatmeal with berries", "Greek yogurt", "Black coffee"], "calories": 450},
            {"meal": "Lunch", "time": "12:30 PM", "items": ["Grilled chicken salad", "Whole grain bread", "Olive oil dressing"], "calories": 650},
            {"meal": "Snack", "time": "4:00 PM", "items": ["Apple", "Almond butter", "Handful of nuts"], "calories": 300},
            {"meal": "Dinner", "time": "7:00 PM", "items": ["Baked salmon", "Quinoa", "Steamed vegetables"], "calories": 700}
        ],
        "hydration": "8-10 glasses of water",
        "budget_estimate": "$12-15/day"
    })
}

fn default_sleep_recommendations() -> JsonValue {
    json!({
        "target_hours": 8,
        "focus": "recovery_optimization",
        "bedtime": "10:30 PM",
        "wake_time": "6:30 AM",
        "sleep_hygiene": [
            "No screens 1 hour before bed",
            "Keep bedroom at 65-68°F",
            "Avoid caffeine after 2 PM",
            "Use blackout curtains"
        ],
        "wind_down_routine": ["Light stretching", "Reading", "Deep breathing exercises"]
    })
}

fn default_wellness_recommendations() -> JsonValue {
    json!({
        "focus": "stress_management",
        "daily_practices": [
            {"activity": "Morning Meditation", "duration": "10 min", "time": "6:45 AM"},
            {"activity": "Gratitude Journaling", "duration": "5 min", "time": "9:00 PM"},
            {"activity": "Mindful Walking", "duration": "15 min", "time": "12:00 PM"}
        ],
        "stress_management": ["Progressive muscle relaxation", "Box breathing technique"],
        "mood_tracking": "Daily check-in recommended",
        "social_connection": "Schedule one meaningful conversation daily"
    })
}
