//! Locale selection and the string dictionary the form reads from.
//!
//! The dictionary is picked once at start-up and only read afterwards.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Some(Locale::En),
            "fr" | "french" | "francais" => Some(Locale::Fr),
            _ => None,
        }
    }

    pub fn dictionary(&self) -> Dictionary {
        match self {
            Locale::En => Dictionary::english(),
            Locale::Fr => Dictionary::french(),
        }
    }
}

/// User-visible strings for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    pub name_required: &'static str,
    pub whatsapp_required: &'static str,
    pub invalid_whatsapp: &'static str,
    pub business_id_required: &'static str,
    pub user_added_success: &'static str,
    pub upload_files: &'static str,
    pub add_user: &'static str,
    pub cancel: &'static str,
    pub search_placeholder: &'static str,
    pub tenants: &'static str,
    pub drop_hint: &'static str,
    pub allowed_types_hint: &'static str,
    pub uploaded_files: &'static str,
    pub tenant: &'static str,
    pub no_tenant_selected: &'static str,
    pub search: &'static str,
    pub sort: &'static str,
    pub path: &'static str,
    pub whatsapp_number: &'static str,
    pub business_id: &'static str,
    pub status: &'static str,
    pub created: &'static str,
    pub active_users: &'static str,
    pub response_rate: &'static str,
    pub total_conversations: &'static str,
    pub fields_need_attention: &'static str,
    pub could_not_read: &'static str,
}

impl Dictionary {
    pub fn english() -> Self {
        Self {
            name_required: "Name is required",
            whatsapp_required: "WhatsApp number is required",
            invalid_whatsapp: "Invalid WhatsApp number",
            business_id_required: "Business ID is required",
            user_added_success: "User added successfully!",
            upload_files: "Upload Files",
            add_user: "Add User",
            cancel: "Cancel",
            search_placeholder: "Search by name or WhatsApp number",
            tenants: "Tenants",
            drop_hint: "Drop files here or press o to pick a path",
            allowed_types_hint: "Only PDF, CSV, Text Files Allowed",
            uploaded_files: "Uploaded Files",
            tenant: "Tenant",
            no_tenant_selected: "No tenant selected",
            search: "Search",
            sort: "sort",
            path: "Path",
            whatsapp_number: "WhatsApp number",
            business_id: "Business ID",
            status: "Status",
            created: "Created",
            active_users: "Active users",
            response_rate: "Response rate",
            total_conversations: "Total conversations",
            fields_need_attention: "field(s) need attention",
            could_not_read: "Could not read",
        }
    }

    pub fn french() -> Self {
        Self {
            name_required: "Le nom est obligatoire",
            whatsapp_required: "Le numéro WhatsApp est obligatoire",
            invalid_whatsapp: "Numéro WhatsApp invalide",
            business_id_required: "L'identifiant d'entreprise est obligatoire",
            user_added_success: "Utilisateur ajouté avec succès !",
            upload_files: "Téléverser des fichiers",
            add_user: "Ajouter",
            cancel: "Annuler",
            search_placeholder: "Rechercher par nom ou numéro WhatsApp",
            tenants: "Clients",
            drop_hint: "Déposez des fichiers ici ou appuyez sur o pour choisir un chemin",
            allowed_types_hint: "Fichiers PDF, CSV et texte uniquement",
            uploaded_files: "Fichiers téléversés",
            tenant: "Client",
            no_tenant_selected: "Aucun client sélectionné",
            search: "Recherche",
            sort: "tri",
            path: "Chemin",
            whatsapp_number: "Numéro WhatsApp",
            business_id: "ID d'entreprise",
            status: "Statut",
            created: "Créé le",
            active_users: "Utilisateurs actifs",
            response_rate: "Taux de réponse",
            total_conversations: "Conversations totales",
            fields_need_attention: "champ(s) à corriger",
            could_not_read: "Lecture impossible",
        }
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parsing_is_case_insensitive() {
        assert_eq!(Locale::from_str("FR"), Some(Locale::Fr));
        assert_eq!(Locale::from_str("en"), Some(Locale::En));
        assert_eq!(Locale::from_str("de"), None);
    }

    #[test]
    fn test_default_dictionary_is_english() {
        assert_eq!(Dictionary::default().name_required, "Name is required");
        assert_eq!(Locale::default().dictionary(), Dictionary::english());
    }

    #[test]
    fn test_french_labels_differ_from_english() {
        let en = Dictionary::english();
        let fr = Locale::Fr.dictionary();
        assert_eq!(fr.tenant, "Client");
        assert_ne!(fr.whatsapp_number, en.whatsapp_number);
        assert_ne!(fr.total_conversations, en.total_conversations);
    }
}
