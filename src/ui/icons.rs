pub struct Icons;

impl Icons {
    pub const GRADUATE: &str = "🎓";
    pub const BOOKS: &str = "📚";
    pub const PENCIL: &str = "✏️";
    pub const TROPHY: &str = "🏆";
    pub const PERSON: &str = "👤";
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const SPARKLE: &str = "✨";
    pub const EMPTY: &str = "∅";
}
