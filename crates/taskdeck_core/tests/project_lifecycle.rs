use rusqlite::Connection;
use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    EntityKind, NewProject, NewSection, NewTodo, ProjectPatch, ProjectService, ProjectState,
    SectionService, ServiceError, SqliteProjectRepository, SqliteSectionRepository,
    SqliteTodoRepository, TodoService, ValidationError,
};

struct Services<'conn> {
    projects: ProjectService<SqliteProjectRepository<'conn>>,
    sections: SectionService<SqliteSectionRepository<'conn>>,
    todos: TodoService<SqliteTodoRepository<'conn>>,
}

fn services(conn: &Connection) -> Services<'_> {
    Services {
        projects: ProjectService::new(SqliteProjectRepository::try_new(conn).unwrap()),
        sections: SectionService::new(SqliteSectionRepository::try_new(conn).unwrap()),
        todos: TodoService::new(SqliteTodoRepository::try_new(conn).unwrap()),
    }
}

#[test]
fn create_ignores_client_archived_flag() {
    let conn = open_db_in_memory().unwrap();
    let s = services(&conn);

    let input = NewProject {
        archived: Some(true),
        ..NewProject::new("Home")
    };
    let created = s.projects.create_project(input).unwrap();
    assert!(!created.project.archived);
    assert_eq!(created.project.state(), ProjectState::Active);
    assert_eq!(created.count.sections, 0);
}

#[test]
fn archive_hides_project_and_purge_removes_it() {
    let conn = open_db_in_memory().unwrap();
    let s = services(&conn);

    let a = s.projects.create_project(NewProject::new("A")).unwrap();
    let b = s.projects.create_project(NewProject::new("B")).unwrap();

    s.projects.archive_project(a.project.id).unwrap();

    let visible = s.projects.list_projects(false).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].project.id, b.project.id);
    assert_eq!(s.projects.list_projects(true).unwrap().len(), 2);

    assert_eq!(s.projects.purge_archived().unwrap().deleted, 1);
    assert_eq!(s.projects.purge_archived().unwrap().deleted, 0);

    let all = s.projects.list_projects(true).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].project.name, "B");
}

#[test]
fn archive_and_unarchive_are_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let s = services(&conn);

    let id = s
        .projects
        .create_project(NewProject::new("Home"))
        .unwrap()
        .project
        .id;

    assert!(s.projects.archive_project(id).unwrap().project.archived);
    assert!(s.projects.archive_project(id).unwrap().project.archived);
    assert!(!s.projects.unarchive_project(id).unwrap().project.archived);
    assert!(!s.projects.unarchive_project(id).unwrap().project.archived);

    assert!(matches!(
        s.projects.archive_project(id + 100),
        Err(ServiceError::NotFound {
            entity: EntityKind::Project,
            ..
        })
    ));
}

#[test]
fn update_applies_partial_fields_and_coerced_archived() {
    let conn = open_db_in_memory().unwrap();
    let s = services(&conn);

    let id = s
        .projects
        .create_project(NewProject::new("Home"))
        .unwrap()
        .project
        .id;

    let patch: ProjectPatch =
        serde_json::from_str(r##"{"color":"#FFAA00","archived":"on"}"##).unwrap();
    let updated = s.projects.update_project(id, patch).unwrap();
    assert_eq!(updated.project.name, "Home");
    assert_eq!(updated.project.color.as_deref(), Some("#FFAA00"));
    assert!(updated.project.archived);

    let unchanged = s.projects.update_project(id, ProjectPatch::default()).unwrap();
    assert_eq!(unchanged.project.updated_at, updated.project.updated_at);

    let too_long = ProjectPatch {
        name: Some("x".repeat(101)),
        ..ProjectPatch::default()
    };
    assert!(matches!(
        s.projects.update_project(id, too_long),
        Err(ServiceError::Validation(ValidationError::NameTooLong { .. }))
    ));

    assert!(matches!(
        s.projects.update_project(id + 1, ProjectPatch::default()),
        Err(ServiceError::NotFound { .. })
    ));
}

#[test]
fn delete_cascades_to_sections_and_detaches_todos() {
    let conn = open_db_in_memory().unwrap();
    let s = services(&conn);

    let project = s.projects.create_project(NewProject::new("Home")).unwrap();
    let section = s
        .sections
        .create_section(NewSection::new("Kitchen", project.project.id))
        .unwrap();
    let todo = s
        .todos
        .create_todo(NewTodo {
            section_id: Some(section.section.id),
            ..NewTodo::new("Buy milk")
        })
        .unwrap();

    s.projects.delete_project(project.project.id).unwrap();

    assert!(matches!(
        s.sections.get_section(section.section.id),
        Err(ServiceError::NotFound { .. })
    ));
    let orphan = s.todos.get_todo(todo.todo.id, false).unwrap();
    assert!(orphan.todo.section_id.is_none());
    assert!(orphan.section.is_none());

    assert!(matches!(
        s.projects.delete_project(project.project.id),
        Err(ServiceError::NotFound { .. })
    ));
}

#[test]
fn counts_exclude_soft_deleted_todos() {
    let conn = open_db_in_memory().unwrap();
    let s = services(&conn);

    let project = s.projects.create_project(NewProject::new("Home")).unwrap();
    let section_id = s
        .sections
        .create_section(NewSection::new("Kitchen", project.project.id))
        .unwrap()
        .section
        .id;

    let kept = s
        .todos
        .create_todo(NewTodo {
            section_id: Some(section_id),
            ..NewTodo::new("Keep")
        })
        .unwrap();
    let hidden = s
        .todos
        .create_todo(NewTodo {
            section_id: Some(section_id),
            ..NewTodo::new("Hide")
        })
        .unwrap();
    s.todos.soft_delete_todo(hidden.todo.id).unwrap();

    let overview = s.projects.list_projects(false).unwrap().remove(0);
    assert_eq!(overview.count.sections, 1);
    assert_eq!(overview.sections[0].count.todos, 1);

    let detail = s.projects.get_project(project.project.id).unwrap();
    assert_eq!(detail.sections.len(), 1);
    assert_eq!(detail.sections[0].todos.len(), 1);
    assert_eq!(detail.sections[0].todos[0].id, kept.todo.id);

    let json = serde_json::to_value(&overview).unwrap();
    assert_eq!(json["_count"]["sections"], 1);
    assert_eq!(json["sections"][0]["_count"]["todos"], 1);
    assert_eq!(json["archived"], false);
}

#[test]
fn get_of_missing_project_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let s = services(&conn);

    let err = s.projects.get_project(7).unwrap_err();
    assert_eq!(err.kind(), "not_found");
    assert_eq!(err.to_string(), "project not found: 7");
}
