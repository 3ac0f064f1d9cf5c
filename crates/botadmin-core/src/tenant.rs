//! Tenant records shown by the directory and detail screens.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: u32,
    pub name: String,
    pub whatsapp_number: String,
    /// ISO-8601 date, so lexical order is chronological order.
    pub creation_date: String,
    pub status: String,
    pub whatsapp_business_id: String,
    pub active_users: u32,
    pub response_rate: String,
    pub total_conversations: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    Name,
    JoinDate,
    ActiveUsers,
}

impl SortKey {
    pub fn all() -> Vec<SortKey> {
        vec![SortKey::None, SortKey::Name, SortKey::JoinDate, SortKey::ActiveUsers]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::None => "Default",
            SortKey::Name => "Name",
            SortKey::JoinDate => "Join date",
            SortKey::ActiveUsers => "Active users",
        }
    }

    pub fn next(&self) -> SortKey {
        match self {
            SortKey::None => SortKey::Name,
            SortKey::Name => SortKey::JoinDate,
            SortKey::JoinDate => SortKey::ActiveUsers,
            SortKey::ActiveUsers => SortKey::None,
        }
    }
}

/// In-memory tenant list with search and sort.
#[derive(Debug, Clone, Default)]
pub struct TenantDirectory {
    tenants: Vec<Tenant>,
}

impl TenantDirectory {
    pub fn new(tenants: Vec<Tenant>) -> Self {
        Self { tenants }
    }

    /// Demo records used until a backend exists.
    pub fn placeholder() -> Self {
        let tenant = |id, name: &str, number: &str, date: &str, business: &str, users, rate: &str, convos| Tenant {
            id,
            name: name.to_string(),
            whatsapp_number: number.to_string(),
            creation_date: date.to_string(),
            status: "Active".to_string(),
            whatsapp_business_id: business.to_string(),
            active_users: users,
            response_rate: rate.to_string(),
            total_conversations: convos,
        };

        Self::new(vec![
            tenant(1, "Alice Smith", "+1234567890", "2023-08-15", "BUS12345", 15, "98%", 150),
            tenant(2, "Bob Johnson", "+0987654321", "2023-09-10", "BUS67890", 8, "85%", 75),
            tenant(3, "Carol White", "+1112223333", "2024-01-05", "BUS11223", 5, "60%", 30),
        ])
    }

    pub fn all(&self) -> &[Tenant] {
        &self.tenants
    }

    pub fn get(&self, id: u32) -> Option<&Tenant> {
        self.tenants.iter().find(|t| t.id == id)
    }

    /// Case-insensitive name match or raw number substring, then sorted.
    pub fn search(&self, query: &str, sort: SortKey) -> Vec<&Tenant> {
        let needle = query.to_lowercase();
        let mut matches: Vec<&Tenant> = self
            .tenants
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&needle) || t.whatsapp_number.contains(query))
            .collect();

        match sort {
            SortKey::None => {}
            SortKey::Name => matches.sort_by_key(|t| t.name.to_lowercase()),
            SortKey::JoinDate => matches.sort_by(|a, b| b.creation_date.cmp(&a.creation_date)),
            SortKey::ActiveUsers => matches.sort_by(|a, b| b.active_users.cmp(&a.active_users)),
        }

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tenants: &[&Tenant]) -> Vec<u32> {
        tenants.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_search_by_name_ignores_case() {
        let dir = TenantDirectory::placeholder();
        assert_eq!(ids(&dir.search("carol", SortKey::None)), vec![3]);
        assert_eq!(ids(&dir.search("", SortKey::None)), vec![1, 2, 3]);
    }

    #[test]
    fn test_search_by_number() {
        let dir = TenantDirectory::placeholder();
        assert_eq!(ids(&dir.search("+0987", SortKey::None)), vec![2]);
        assert!(dir.search("nobody", SortKey::None).is_empty());
    }

    #[test]
    fn test_sort_orders() {
        let dir = TenantDirectory::placeholder();
        assert_eq!(ids(&dir.search("", SortKey::JoinDate)), vec![3, 2, 1]);
        assert_eq!(ids(&dir.search("", SortKey::ActiveUsers)), vec![1, 2, 3]);

        let dir = TenantDirectory::new(vec![
            Tenant { name: "zed".into(), ..dir.all()[0].clone() },
            Tenant { id: 9, name: "Amy".into(), ..dir.all()[1].clone() },
        ]);
        assert_eq!(ids(&dir.search("", SortKey::Name)), vec![9, 1]);
    }

    #[test]
    fn test_sort_key_cycles() {
        let mut key = SortKey::default();
        for _ in 0..SortKey::all().len() {
            key = key.next();
        }
        assert_eq!(key, SortKey::None);
    }
}
