//! Command handlers.

use tracing::{debug, warn};

use super::{Cli, Command, DeleteMode, FilesCommand, FoldersCommand, GroupsCommand, UsersCommand};
use crate::api::{ApiClient, AuthService, FileService, FolderService, GroupService, UploadRequest};
use crate::config::Config;
use crate::model::{filter_users, format_size, NewGroup, NewUser, UserUpdate};
use crate::session::SessionStore;
use crate::tree::delete::{load_subtree, plan_for_leaf};
use crate::tree::{
    direct_subfolders, render_tree, total_files_concurrently, update_with_subfolders,
    with_total_files, DeletionMode, DeletionPlan, FolderDraft, FolderTree, NestedFolderEditor,
    TreePath,
};
use crate::{DocdeskError, Result};

/// Open the session store, build the client and run one command.
///
/// A rejected token clears the stored login before the error is returned.
pub async fn run(cli: Cli, config: &Config) -> Result<()> {
    let mut store = SessionStore::open(&config.session.path)?;
    let device_id = store.device_id()?;
    let client = ApiClient::new(&config.api, device_id)?
        .with_token(store.token().map(str::to_string));
    debug!(base_url = %client.base_url(), "Client ready");

    let result = dispatch(cli.command, &client, &mut store).await;
    if let Err(e) = &result {
        if e.is_unauthorized() {
            warn!("Token rejected; clearing stored login");
            store.clear_login()?;
        }
    }
    result
}

async fn dispatch(command: Command, client: &ApiClient, store: &mut SessionStore) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let login = AuthService::new(client)
                .login(store, &email, &password)
                .await?;
            println!(
                "Logged in as {} ({})",
                login.user.display_name(),
                login.user.rol
            );
        }
        Command::Logout => {
            AuthService::new(client).logout(store).await?;
            println!("Logged out");
        }
        Command::Whoami => {
            require_login(store)?;
            let user = AuthService::new(client).profile().await?;
            println!("{} <{}>", user.display_name(), user.email);
            println!("  role:      {}", user.rol);
            if let Some(category) = user.category {
                println!("  category:  {}", category.label());
            }
            if let Some(max) = user.max_sessions {
                println!("  sessions:  {max}");
            }
            println!("  folders:   {}", user.folders.len());
        }
        Command::ChangePassword {
            current,
            new,
            confirm,
        } => {
            require_login(store)?;
            AuthService::new(client)
                .change_password(store, &current, &new, &confirm)
                .await?;
            println!("Password changed. Log in again with the new password.");
        }
        Command::Users(cmd) => {
            require_login(store)?;
            users(cmd, client).await?;
        }
        Command::Folders(cmd) => {
            require_login(store)?;
            folders(cmd, client, store).await?;
        }
        Command::Files(cmd) => {
            require_login(store)?;
            files(cmd, client).await?;
        }
        Command::Groups(cmd) => {
            require_login(store)?;
            groups(cmd, client).await?;
        }
    }
    Ok(())
}

fn require_login(store: &SessionStore) -> Result<()> {
    if store.token().is_none() {
        return Err(DocdeskError::Unauthorized);
    }
    Ok(())
}

async fn users(cmd: UsersCommand, client: &ApiClient) -> Result<()> {
    let auth = AuthService::new(client);
    match cmd {
        UsersCommand::List { search } => {
            let all = auth.list_users().await?;
            let shown = filter_users(&all, search.as_deref().unwrap_or_default());
            for user in &shown {
                println!(
                    "{}  {:<30}  {:<28}  {}",
                    user.id,
                    user.display_name(),
                    user.email,
                    user.rol
                );
            }
            println!("{} of {} users", shown.len(), all.len());
        }
        UsersCommand::Create {
            email,
            company,
            nombre,
            category,
            role,
            max_sessions,
            password,
            folders,
        } => {
            let mut new_user = NewUser::new(email, company);
            if let Some(category) = category {
                new_user = new_user.with_category(category);
            }
            if let Some(role) = role {
                new_user = new_user.with_role(role);
            }
            if let Some(max) = max_sessions {
                new_user = new_user.with_max_sessions(max);
            }
            new_user.nombre = nombre;
            new_user.password = password;
            new_user.folders = folders;
            let user = auth.create_user(&new_user).await?;
            println!("Created user {} ({})", user.email, user.id);
        }
        UsersCommand::Update {
            id,
            email,
            company,
            nombre,
            role,
            max_sessions,
            folders,
        } => {
            let update = UserUpdate {
                nombre,
                email,
                company_name: company,
                rol: role,
                max_sessions,
                folders: (!folders.is_empty()).then_some(folders),
            };
            if update.is_empty() {
                return Err(DocdeskError::Validation("nothing to update".to_string()));
            }
            let user = auth.update_user(&id, &update).await?;
            println!("Updated user {}", user.email);
        }
        UsersCommand::Delete { id } => {
            auth.delete_user(&id).await?;
            println!("Deleted user {id}");
        }
        UsersCommand::ResetPassword { id, password } => {
            match auth.reset_user_password(&id, password.as_deref()).await? {
                Some(generated) => println!("New password: {generated}"),
                None => println!("Password reset for user {id}"),
            }
        }
    }
    Ok(())
}

async fn folders(cmd: FoldersCommand, client: &ApiClient, store: &SessionStore) -> Result<()> {
    let service = FolderService::new(client);
    match cmd {
        FoldersCommand::List => {
            let all = service.list_folders().await?;
            for entry in with_total_files(&all) {
                let folder = &entry.folder;
                println!(
                    "{}  {:<32}  {:<26}  {} files ({} in subfolders), {} subfolders",
                    folder.id,
                    folder.name,
                    folder.category_or_default().label(),
                    entry.total_files,
                    entry.subfolder_files(),
                    entry.subfolder_count
                );
            }
        }
        FoldersCommand::Mine => {
            let ids: Vec<String> = store
                .current_user()
                .map(|u| u.folder_ids().into_iter().map(str::to_string).collect())
                .unwrap_or_default();
            for entry in total_files_concurrently(&service, &ids).await? {
                println!(
                    "{}  {:<32}  {} files",
                    entry.folder.id, entry.folder.name, entry.total_files
                );
            }
        }
        FoldersCommand::Tree { id: Some(id) } => {
            let folder = service.get_folder(&id).await?;
            let loaded = load_subtree(&service, &folder).await;
            let tree = FolderTree::from_folders(&loaded.subcarpetas, loaded.category_or_default());
            print!("{}", render_tree(&loaded.name, &tree));
        }
        FoldersCommand::Tree { id: None } => {
            for root in service.hierarchy().await? {
                let tree = FolderTree::from_folders(&root.subcarpetas, root.category_or_default());
                print!("{}", render_tree(&root.name, &tree));
            }
        }
        FoldersCommand::Create {
            name,
            category,
            description,
            parent,
            subs,
        } => {
            let mut draft = FolderDraft::new(name).with_category(category.unwrap_or_default());
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            if let Some(parent) = parent {
                draft = draft.with_parent(parent);
            }
            for chain in &subs {
                draft.add_chain(chain)?;
            }
            let created = draft.submit(&service).await?;
            if created.subfolders_created > 0 {
                println!(
                    "Folder \"{}\" created with {} subfolders",
                    created.root.name, created.subfolders_created
                );
            } else {
                println!("Folder \"{}\" created", created.root.name);
            }
        }
        FoldersCommand::Update { id, name, subs } => {
            let all = service.list_folders().await?;
            let current: Vec<_> = direct_subfolders(&all, &id).into_iter().cloned().collect();
            let sync = update_with_subfolders(&service, &id, &name, &current, &subs).await?;
            println!(
                "Folder updated: {} subfolders removed, {} created",
                sync.deleted.len(),
                sync.created.len()
            );
        }
        FoldersCommand::Rename { id, path, name } => {
            let path: TreePath = path.parse()?;
            let mut editor = open_editor(&service, &id).await?;
            editor.rename(&path, &name).await?;
            println!("Renamed subfolder {path}");
        }
        FoldersCommand::AddSub { id, path, name } => {
            let parent: TreePath = path.parse()?;
            let mut editor = open_editor(&service, &id).await?;
            let created = editor.add_subfolder(&parent, &name).await?;
            println!("Added subfolder at {created}");
        }
        FoldersCommand::RemoveSub { id, path } => {
            let path: TreePath = path.parse()?;
            let mut editor = open_editor(&service, &id).await?;
            let removed = editor.remove(&path).await?;
            println!(
                "Removed \"{}\" and {} nested subfolders",
                removed.name,
                removed.count_descendants()
            );
        }
        FoldersCommand::Delete { id, mode, selected } => {
            let folder = service.get_folder(&id).await?;
            let loaded = load_subtree(&service, &folder).await;
            let plan = match mode {
                // Selected ids are only ever checked against the loaded subtree.
                DeleteMode::Selected => {
                    DeletionPlan::new(&loaded, DeletionMode::Selected(selected))?
                }
                _ if loaded.subcarpetas.is_empty() => plan_for_leaf(&loaded),
                DeleteMode::All => DeletionPlan::new(&loaded, DeletionMode::All)?,
                DeleteMode::Parent => DeletionPlan::new(&loaded, DeletionMode::ParentOnly)?,
            };
            let outcome = plan.execute(&service).await?;
            match outcome.mode {
                DeletionMode::Selected(_) => {
                    println!("{} subfolders deleted", outcome.count())
                }
                DeletionMode::All => {
                    println!("Folder \"{}\" and all its subfolders deleted", loaded.name)
                }
                DeletionMode::ParentOnly => println!("Folder \"{}\" deleted", loaded.name),
            }
        }
        FoldersCommand::Assign { id, users } => {
            service.assign_users(&id, &users).await?;
            println!("Assigned {} users to folder {id}", users.len());
        }
        FoldersCommand::ByCategory { category } => {
            let found = service.by_category(category).await?;
            for folder in &found {
                println!("{}  {}", folder.id, folder.name);
            }
            println!("{} folders in {}", found.len(), category.label());
        }
        FoldersCommand::Debug => {
            let report = service.debug_folders().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        FoldersCommand::Seed => {
            let report = service.create_test_folders().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        FoldersCommand::Purge { yes } => {
            if !yes {
                return Err(DocdeskError::Validation(
                    "purging deletes every folder; pass --yes to confirm".to_string(),
                ));
            }
            let report = service.clear_all_folders().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

async fn open_editor<'a>(
    service: &FolderService<'a>,
    folder_id: &str,
) -> Result<NestedFolderEditor<FolderService<'a>>> {
    let folder = service.get_folder(folder_id).await?;
    Ok(NestedFolderEditor::load(*service, folder).await)
}

async fn files(cmd: FilesCommand, client: &ApiClient) -> Result<()> {
    let service = FileService::new(client);
    match cmd {
        FilesCommand::List { folder } => {
            let entries = service.list_files(&folder).await?;
            for entry in &entries {
                println!(
                    "{}  {:<40}  {:>10}  {}",
                    entry.id,
                    entry.name,
                    entry.display_size(),
                    entry.description.as_deref().unwrap_or_default()
                );
            }
            let total: u64 = entries.iter().filter_map(|e| e.size).sum();
            println!("{} files, {}", entries.len(), format_size(total));
        }
        FilesCommand::Upload {
            folder,
            file,
            name,
            description,
        } => {
            let mut request = UploadRequest::new(file, folder);
            if let Some(name) = name {
                request = request.with_name(name);
            }
            if let Some(description) = description {
                request = request.with_description(description);
            }
            let entry = service.upload(&request).await?;
            println!("Uploaded \"{}\" ({})", entry.name, entry.id);
        }
        FilesCommand::Download { id, out } => {
            let size = service.download_to(&id, &out).await?;
            println!("Saved {} to {}", format_size(size as u64), out.display());
        }
        FilesCommand::Delete { id } => {
            service.delete_file(&id).await?;
            println!("Deleted file {id}");
        }
        FilesCommand::Url { id } => {
            println!("{}", service.view_url(&id));
        }
    }
    Ok(())
}

async fn groups(cmd: GroupsCommand, client: &ApiClient) -> Result<()> {
    let service = GroupService::new(client);
    match cmd {
        GroupsCommand::List => {
            for group in service.list_groups().await? {
                println!("{}  {:<30}  {} users", group.id, group.name, group.users.len());
            }
        }
        GroupsCommand::Create { name, users } => {
            let group = service.create_group(&NewGroup { name, users }).await?;
            println!("Created group \"{}\" ({})", group.name, group.id);
        }
        GroupsCommand::AddUser { id, user } => {
            service.add_user(&id, &user).await?;
            println!("Added user {user} to group {id}");
        }
        GroupsCommand::RemoveUser { id, user } => {
            service.remove_user(&id, &user).await?;
            println!("Removed user {user} from group {id}");
        }
        GroupsCommand::Delete { id } => {
            service.delete_group(&id).await?;
            println!("Deleted group {id}");
        }
    }
    Ok(())
}
