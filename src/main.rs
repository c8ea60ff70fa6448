//! `subtler` is a command line companion for the subtle window manager. It finds clients, tags,
//! views, gravities, sublets, trays and screens the same way scripts using `libsubtlext` do and
//! either lists them or changes them. Mapping `subtler` commands to key bindings or panel scripts
//! allows for controlling subtle from outside of its config.
//!
//! ## Command line examples
//!
//! ### Selectors
//! Every action taking a `SELECTOR` accepts an index like `2`, a window id like `0x1a00004`, an
//! exact name or keyword like `:www` or `:current`, a property match like `class=URxvt`, a `#` to
//! pick a window with the pointer, or any other text as a case-insensitive regular expression.
//!
//! ### Toggle fullscreen
//! Toggle fullscreen for every terminal.
//! ```bash
//! subtler client full xterm
//! ```
//!
//! ### Tag a client
//! Add the `www` tag to the client under the pointer.
//! ```bash
//! subtler client tag '#' www
//! ```
//!
//! ### Send data to a sublet
//! Feed the output of a command to the data handler of a sublet.
//! ```bash
//! date | subtler sublet data clock -
//! ```
use std::io::{self, Read};

use clap::{crate_description, crate_version, Arg, ArgAction, ArgMatches, Command};
use gory::*;
use libsubtlext::prelude::*;
use tracing::Level;
use witcher::prelude::*;

// Selector argument shared by most actions
fn selector_arg() -> Arg {
    Arg::new("selector").value_name("SELECTOR").required(true).help("Index, :name, key=value, # or pattern")
}

fn action(name: &'static str, alias: &'static str, about: &'static str) -> Command {
    Command::new(name).visible_alias(alias).about(about)
}

fn with_selector(name: &'static str, alias: &'static str, about: &'static str) -> Command {
    action(name, alias, about).arg(selector_arg())
}

fn tag_action(name: &'static str, alias: &'static str, about: &'static str) -> Command {
    with_selector(name, alias, about)
        .arg(Arg::new("tags").value_name("TAG").required(true).num_args(1..).help("Exact tag names or indices"))
}

fn group(name: &'static str, alias: &'static str, about: &'static str) -> Command {
    Command::new(name).visible_alias(alias).about(about).subcommand_required(true).arg_required_else_help(true)
}

fn cli() -> Command {
    Command::new("subtler")
        .about(crate_description!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .version(crate_version!())
        .arg(
            Arg::new("display")
                .short('d')
                .long("display")
                .value_name("DISPLAY")
                .global(true)
                .help("Connect to DISPLAY instead of $DISPLAY"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log more, repeat for even more"),
        )
        .subcommand(
            group("client", "c", "Find and control client windows")
                .subcommand(action("list", "l", "List all clients"))
                .subcommand(with_selector("find", "f", "Find clients"))
                .subcommand(action("current", "C", "Show the focused client"))
                .subcommand(action("select", "X", "Pick a client with the pointer"))
                .subcommand(with_selector("focus", "o", "Focus a client"))
                .subcommand(with_selector("full", "F", "Toggle fullscreen"))
                .subcommand(with_selector("float", "O", "Toggle floating"))
                .subcommand(with_selector("stick", "S", "Toggle sticky"))
                .subcommand(with_selector("urgent", "N", "Toggle urgent"))
                .subcommand(with_selector("resize", "Z", "Toggle resize hints"))
                .subcommand(with_selector("zaphod", "P", "Toggle spanning all screens"))
                .subcommand(with_selector("fixed", "I", "Toggle fixed size"))
                .subcommand(with_selector("borderless", "B", "Toggle the border"))
                .subcommand(with_selector("raise", "E", "Raise a client"))
                .subcommand(with_selector("lower", "L", "Lower a client"))
                .subcommand(with_selector("retag", "A", "Apply the tagging rules again"))
                .subcommand(tag_action("tag", "T", "Add tags to a client"))
                .subcommand(tag_action("untag", "U", "Remove tags from a client"))
                .subcommand(tag_action("retags", "R", "Replace all tags of a client"))
                .subcommand(with_selector("tags", "G", "Show the tags of a client"))
                .subcommand(with_selector("views", "W", "Show the views a client is on"))
                .subcommand(
                    with_selector("gravity", "Y", "Set the gravity of a client")
                        .arg(Arg::new("gravity").value_name("GRAVITY").required(true))
                        .arg(Arg::new("view").value_name("VIEW").help("Only on this view")),
                )
                .subcommand(
                    with_selector("move", "M", "Move and resize a client")
                        .arg(Arg::new("geometry").value_name("WxH+X+Y").required(true)),
                )
                .subcommand(with_selector("kill", "k", "Close a client")),
        )
        .subcommand(
            group("gravity", "g", "Manage gravities")
                .subcommand(action("list", "l", "List all gravities"))
                .subcommand(with_selector("find", "f", "Find gravities"))
                .subcommand(
                    action("add", "a", "Create a gravity")
                        .arg(Arg::new("name").value_name("NAME").required(true))
                        .arg(Arg::new("geometry").value_name("WxH+X+Y").required(true).help("In percent of the screen")),
                )
                .subcommand(
                    with_selector("tiling", "i", "Set the tiling mode")
                        .arg(Arg::new("mode").value_name("MODE").required(true).help("none, horz or vert")),
                )
                .subcommand(with_selector("clients", "I", "Show clients with a gravity"))
                .subcommand(with_selector("kill", "k", "Remove a gravity")),
        )
        .subcommand(
            group("screen", "e", "Inspect screens")
                .subcommand(action("list", "l", "List all screens"))
                .subcommand(with_selector("find", "f", "Find screens"))
                .subcommand(action("current", "C", "Show the screen under the pointer"))
                .subcommand(
                    with_selector("view", "v", "Show or set the view of a screen")
                        .arg(Arg::new("view").value_name("VIEW").help("View to show")),
                )
                .subcommand(with_selector("jump", "j", "Focus a screen")),
        )
        .subcommand(
            group("sublet", "s", "Control sublets")
                .subcommand(action("list", "l", "List all sublets"))
                .subcommand(with_selector("find", "f", "Find sublets"))
                .subcommand(with_selector("update", "u", "Run the update handler"))
                .subcommand(
                    with_selector("data", "D", "Send data to a sublet")
                        .arg(Arg::new("data").value_name("DATA").required(true).help("Text or - for stdin")),
                )
                .subcommand(with_selector("show", "S", "Show a sublet"))
                .subcommand(with_selector("hide", "H", "Hide a sublet"))
                .subcommand(with_selector("style", "y", "Select a style").arg(Arg::new("style").value_name("STYLE")))
                .subcommand(with_selector("kill", "k", "Unload a sublet")),
        )
        .subcommand(
            group("tag", "t", "Manage tags")
                .subcommand(action("list", "l", "List all tags"))
                .subcommand(with_selector("find", "f", "Find tags"))
                .subcommand(action("add", "a", "Create a tag").arg(Arg::new("name").value_name("NAME").required(true)))
                .subcommand(with_selector("clients", "I", "Show clients with a tag"))
                .subcommand(with_selector("views", "W", "Show views with a tag"))
                .subcommand(with_selector("kill", "k", "Remove a tag")),
        )
        .subcommand(
            group("tray", "y", "Inspect tray icons")
                .subcommand(action("list", "l", "List all tray icons"))
                .subcommand(with_selector("find", "f", "Find tray icons"))
                .subcommand(with_selector("kill", "k", "Close a tray icon")),
        )
        .subcommand(
            group("view", "v", "Manage views")
                .subcommand(action("list", "l", "List all views"))
                .subcommand(with_selector("find", "f", "Find views"))
                .subcommand(action("current", "C", "Show the current view"))
                .subcommand(action("add", "a", "Create a view").arg(Arg::new("name").value_name("NAME").required(true)))
                .subcommand(with_selector("jump", "j", "Show a view on the current screen"))
                .subcommand(tag_action("tag", "T", "Add tags to a view"))
                .subcommand(tag_action("untag", "U", "Remove tags from a view"))
                .subcommand(tag_action("retags", "R", "Replace all tags of a view"))
                .subcommand(with_selector("tags", "G", "Show the tags of a view"))
                .subcommand(with_selector("clients", "I", "Show the clients on a view"))
                .subcommand(with_selector("style", "y", "Select a style").arg(Arg::new("style").value_name("STYLE")))
                .subcommand(with_selector("kill", "k", "Remove a view")),
        )
        .subcommand(
            group("subtle", "w", "Control subtle itself")
                .subcommand(action("running", "i", "Check if subtle is running"))
                .subcommand(action("version", "V", "Show the version of subtle"))
                .subcommand(action("reload", "r", "Reload the config"))
                .subcommand(action("restart", "R", "Restart subtle"))
                .subcommand(action("quit", "q", "Quit subtle"))
                .subcommand(action("render", "n", "Redraw the panels"))
                .subcommand(action("select", "X", "Pick a window with the pointer")),
        )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).init();
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));
    if let Err(err) = run(&matches) {
        eprintln!("{} {}", "error:".red(), err);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let display = matches.get_one::<String>("display").map(|x| x.as_str());
    let subtle = Subtle::connect(display).wrap("failed to connect to the X server")?;

    match matches.subcommand() {
        Some(("subtle", sub)) => return control(&subtle, sub),
        _ => control::ensure_running(&subtle).wrap("subtle is required for this")?,
    }
    match matches.subcommand() {
        Some(("client", sub)) => client(&subtle, sub),
        Some(("gravity", sub)) => gravity(&subtle, sub),
        Some(("screen", sub)) => screen(&subtle, sub),
        Some(("sublet", sub)) => sublet(&subtle, sub),
        Some(("tag", sub)) => tag(&subtle, sub),
        Some(("tray", sub)) => tray(&subtle, sub),
        Some(("view", sub)) => view(&subtle, sub),
        _ => unreachable!(),
    }
}

// Arguments
//--------------------------------------------------------------------------------------------------
fn arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(|x| x.as_str())
        .ok_or_else(|| SubtlextError::InvalidArgument(format!("missing {}", name)))
        .pass()
}

fn opt<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches.get_one::<String>(name).map(|x| x.as_str())
}

fn parse_selector<E>(text: &str) -> Result<Selector<E>> {
    text.parse::<Selector<E>>().pass()
}

fn tag_args(matches: &ArgMatches) -> Result<Vec<Selector<Tag>>> {
    let mut tags = vec![];
    for name in matches.get_many::<String>("tags").into_iter().flatten() {
        tags.push(parse_selector(name)?);
    }
    Ok(tags)
}

/// Every entity matching the selector argument, failing when there is none
fn lookup<E: Entity>(subtle: &Subtle, matches: &ArgMatches) -> Result<Vec<E>> {
    let text = arg(matches, "selector")?;
    let found = E::find_all(subtle, parse_selector::<E>(text)?).wrap(&format!("failed to find {} {}", E::KIND, text))?;
    if found.is_empty() {
        return Err(SubtlextError::NotFound(format!("{} {}", E::KIND, text))).pass();
    }
    Ok(found)
}

// Groups
//--------------------------------------------------------------------------------------------------
fn client(subtle: &Subtle, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => print_clients(subtle, &Client::list(subtle).pass()?),
        Some(("find", sub)) => print_clients(subtle, &lookup::<Client>(subtle, sub)?),
        Some(("current", _)) => print_clients(subtle, &[Client::current(subtle).pass()?]),
        Some(("select", _)) => {
            let mut client = Client::new(control::select_window(subtle).pass()?);
            client.update(subtle).pass()?;
            print_clients(subtle, &[client])
        }
        Some(("tags", sub)) => {
            for client in lookup::<Client>(subtle, sub)? {
                print_tags(subtle, &client.tags(subtle).pass()?)?;
            }
            Ok(())
        }
        Some(("views", sub)) => {
            for client in lookup::<Client>(subtle, sub)? {
                print_views(subtle, &client.views(subtle).pass()?)?;
            }
            Ok(())
        }
        Some((action, sub)) => {
            let tags = match action {
                "tag" | "untag" | "retags" => tag_args(sub)?,
                _ => vec![],
            };
            for mut client in lookup::<Client>(subtle, sub)? {
                match action {
                    "focus" => client.focus(subtle),
                    "raise" => client.raise(subtle),
                    "lower" => client.lower(subtle),
                    "retag" => client.retag(subtle),
                    "kill" => client.kill(subtle),
                    "tag" => client.tag(subtle, tags.clone()),
                    "untag" => client.untag(subtle, tags.clone()),
                    "retags" => client.set_tags(subtle, tags.clone()),
                    "gravity" => {
                        let gravity = parse_selector(arg(sub, "gravity")?)?;
                        let view = match opt(sub, "view") {
                            Some(view) => Some(parse_selector(view)?),
                            None => None,
                        };
                        client.set_gravity(subtle, gravity, view)
                    }
                    "move" => {
                        let geom: Geometry = arg(sub, "geometry")?.parse().pass()?;
                        client.move_resize(subtle, geom)
                    }
                    flag => {
                        let flags = ClientFlags::try_from(flag).pass()?;
                        client.toggle(subtle, flags)
                    }
                }
                .wrap(&format!("failed to {} client {:#x}", action, client.win))?;
            }
            Ok(())
        }
        _ => unreachable!(),
    }
}

fn gravity(subtle: &Subtle, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => print_gravities(&Gravity::list(subtle).pass()?),
        Some(("find", sub)) => print_gravities(&lookup::<Gravity>(subtle, sub)?),
        Some(("add", sub)) => {
            let geom: Geometry = arg(sub, "geometry")?.parse().pass()?;
            let mut gravity = Gravity::new(arg(sub, "name")?, Some(geom));
            gravity.save(subtle).wrap("failed to create gravity")?;
            print_gravities(&[gravity])
        }
        Some(("tiling", sub)) => {
            let tiling = Tiling::try_from(arg(sub, "mode")?).pass()?;
            for gravity in lookup::<Gravity>(subtle, sub)? {
                gravity.tiling(subtle, tiling).pass()?;
            }
            Ok(())
        }
        Some(("clients", sub)) => {
            for gravity in lookup::<Gravity>(subtle, sub)? {
                print_clients(subtle, &gravity.clients(subtle).pass()?)?;
            }
            Ok(())
        }
        Some(("kill", sub)) => {
            for mut gravity in lookup::<Gravity>(subtle, sub)? {
                gravity.kill(subtle).pass()?;
            }
            Ok(())
        }
        _ => unreachable!(),
    }
}

fn screen(subtle: &Subtle, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => print_screens(&Screen::list(subtle).pass()?),
        Some(("find", sub)) => print_screens(&lookup::<Screen>(subtle, sub)?),
        Some(("current", _)) => print_screens(&Screen::current(subtle).pass()?.into_iter().collect::<Vec<_>>()),
        Some(("view", sub)) => {
            for screen in lookup::<Screen>(subtle, sub)? {
                match opt(sub, "view") {
                    Some(view) => screen.set_view(subtle, parse_selector(view)?).pass()?,
                    None => print_views(subtle, &screen.view(subtle).pass()?.into_iter().collect::<Vec<_>>())?,
                }
            }
            Ok(())
        }
        Some(("jump", sub)) => {
            for screen in lookup::<Screen>(subtle, sub)? {
                screen.jump(subtle).pass()?;
            }
            Ok(())
        }
        _ => unreachable!(),
    }
}

fn sublet(subtle: &Subtle, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => print_sublets(&Sublet::list(subtle).pass()?),
        Some(("find", sub)) => print_sublets(&lookup::<Sublet>(subtle, sub)?),
        Some(("data", sub)) => {
            let data = match arg(sub, "data")? {
                "-" => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf).wrap("failed to read data from stdin")?;
                    buf.trim_end_matches('\n').to_owned()
                }
                data => data.to_owned(),
            };
            for sublet in lookup::<Sublet>(subtle, sub)? {
                sublet.send_data(subtle, &data).pass()?;
            }
            Ok(())
        }
        Some((action, sub)) => {
            for mut sublet in lookup::<Sublet>(subtle, sub)? {
                match action {
                    "update" => sublet.update(subtle),
                    "show" => sublet.show(subtle),
                    "hide" => sublet.hide(subtle),
                    "style" => sublet.style(subtle, opt(sub, "style")),
                    "kill" => sublet.kill(subtle),
                    _ => unreachable!(),
                }
                .wrap(&format!("failed to {} sublet {}", action, sublet.name))?;
            }
            Ok(())
        }
        _ => unreachable!(),
    }
}

fn tag(subtle: &Subtle, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => print_tags(subtle, &Tag::list(subtle).pass()?),
        Some(("find", sub)) => print_tags(subtle, &lookup::<Tag>(subtle, sub)?),
        Some(("add", sub)) => {
            let mut tag = Tag::new(arg(sub, "name")?);
            tag.save(subtle).wrap("failed to create tag")?;
            print_tags(subtle, &[tag])
        }
        Some(("clients", sub)) => {
            for tag in lookup::<Tag>(subtle, sub)? {
                print_clients(subtle, &tag.clients(subtle).pass()?)?;
            }
            Ok(())
        }
        Some(("views", sub)) => {
            for tag in lookup::<Tag>(subtle, sub)? {
                print_views(subtle, &tag.views(subtle).pass()?)?;
            }
            Ok(())
        }
        Some(("kill", sub)) => {
            for mut tag in lookup::<Tag>(subtle, sub)? {
                tag.kill(subtle).pass()?;
            }
            Ok(())
        }
        _ => unreachable!(),
    }
}

fn tray(subtle: &Subtle, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => print_trays(&Tray::list(subtle).pass()?),
        Some(("find", sub)) => print_trays(&lookup::<Tray>(subtle, sub)?),
        Some(("kill", sub)) => {
            for mut tray in lookup::<Tray>(subtle, sub)? {
                tray.kill(subtle).pass()?;
            }
            Ok(())
        }
        _ => unreachable!(),
    }
}

fn view(subtle: &Subtle, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("list", _)) => print_views(subtle, &View::list(subtle).pass()?),
        Some(("find", sub)) => print_views(subtle, &lookup::<View>(subtle, sub)?),
        Some(("current", _)) => print_views(subtle, &View::current(subtle).pass()?.into_iter().collect::<Vec<_>>()),
        Some(("add", sub)) => {
            let mut view = View::new(arg(sub, "name")?);
            view.save(subtle).wrap("failed to create view")?;
            print_views(subtle, &[view])
        }
        Some(("tags", sub)) => {
            for view in lookup::<View>(subtle, sub)? {
                print_tags(subtle, &view.tags(subtle).pass()?)?;
            }
            Ok(())
        }
        Some(("clients", sub)) => {
            for view in lookup::<View>(subtle, sub)? {
                print_clients(subtle, &view.clients(subtle).pass()?)?;
            }
            Ok(())
        }
        Some((action, sub)) => {
            let tags = match action {
                "tag" | "untag" | "retags" => tag_args(sub)?,
                _ => vec![],
            };
            for mut view in lookup::<View>(subtle, sub)? {
                match action {
                    "jump" => view.jump(subtle),
                    "tag" => view.tag(subtle, tags.clone()),
                    "untag" => view.untag(subtle, tags.clone()),
                    "retags" => view.set_tags(subtle, tags.clone()),
                    "style" => view.style(subtle, opt(sub, "style")),
                    "kill" => view.kill(subtle),
                    _ => unreachable!(),
                }
                .wrap(&format!("failed to {} view {}", action, view.name))?;
            }
            Ok(())
        }
        _ => unreachable!(),
    }
}

fn control(subtle: &Subtle, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("running", _)) => println!("{}", control::is_running(subtle).pass()?),
        Some(("version", _)) => match control::version(subtle).pass()? {
            Some(version) => println!("{}", version),
            None => return Err(SubtlextError::NotRunning).pass(),
        },
        Some(("reload", _)) => control::reload(subtle).pass()?,
        Some(("restart", _)) => control::restart(subtle).pass()?,
        Some(("quit", _)) => control::quit(subtle).pass()?,
        Some(("render", _)) => control::render(subtle).pass()?,
        Some(("select", _)) => println!("{:#x}", control::select_window(subtle).pass()?),
        _ => unreachable!(),
    }
    Ok(())
}

// Printers
//--------------------------------------------------------------------------------------------------
fn print_clients(subtle: &Subtle, clients: &[Client]) -> Result<()> {
    let current = View::current(subtle).ok().flatten();
    let gravities = Gravity::list(subtle).unwrap_or_default();
    let marks = [
        (ClientFlags::FULL, '+'),
        (ClientFlags::FLOAT, '^'),
        (ClientFlags::STICK, '*'),
        (ClientFlags::RESIZE, '~'),
        (ClientFlags::ZAPHOD, '='),
        (ClientFlags::FIXED, '!'),
    ];
    for client in clients {
        let on_current = current.as_ref().map_or(false, |x| x.tags.intersects(client.tags) || client.is_stick());
        let gravity = client
            .gravity
            .and_then(|id| gravities.iter().find(|x| x.id() == Some(id)))
            .map_or("-", |x| x.name.as_str());
        let flags: String = marks.iter().map(|(flag, mark)| if client.flags.contains(*flag) { *mark } else { '-' }).collect();
        println!(
            "{:#10x} {} {:>12.12} {:<20} {} {} ({})",
            client.win,
            if on_current { '*' } else { '-' },
            gravity,
            client.geometry.to_string(),
            flags,
            client.instance,
            client.class
        );
    }
    Ok(())
}

fn print_views(subtle: &Subtle, views: &[View]) -> Result<()> {
    let visible: Vec<Option<usize>> = View::visible(subtle).pass()?.iter().map(|x| x.id()).collect();
    for view in views {
        let mark = if visible.contains(&view.id()) { '*' } else { '-' };
        println!("{:>2} {} {}", view.id().unwrap_or_default(), mark, view.name);
    }
    Ok(())
}

fn print_tags(subtle: &Subtle, tags: &[Tag]) -> Result<()> {
    let visible: Vec<Option<usize>> = Tag::visible(subtle).pass()?.iter().map(|x| x.id()).collect();
    for tag in tags {
        let mark = if visible.contains(&tag.id()) { '*' } else { '-' };
        println!("{:>2} {} {}", tag.id().unwrap_or_default(), mark, tag.name);
    }
    Ok(())
}

fn print_gravities(gravities: &[Gravity]) -> Result<()> {
    for gravity in gravities {
        let geom = gravity.geometry.map_or("-".to_owned(), |x| x.to_string());
        println!("{:>2} {:<16} {}", gravity.id().unwrap_or_default(), geom, gravity.name);
    }
    Ok(())
}

fn print_sublets(sublets: &[Sublet]) -> Result<()> {
    for sublet in sublets {
        println!("{:>2} {:<16} {}", sublet.id().unwrap_or_default(), sublet.geometry.to_string(), sublet.name);
    }
    Ok(())
}

fn print_screens(screens: &[Screen]) -> Result<()> {
    for screen in screens {
        println!("{:>2} {}", screen.id().unwrap_or_default(), screen.geometry);
    }
    Ok(())
}

fn print_trays(trays: &[Tray]) -> Result<()> {
    for tray in trays {
        println!("{:#10x} {} ({})", tray.win, tray.instance, tray.class);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn test_parse_groups_and_aliases() {
        let matches = cli().try_get_matches_from(["subtler", "-vv", "c", "F", "xterm"]).unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
        let (group, sub) = matches.subcommand().unwrap();
        assert_eq!(group, "client");
        let (action, sub) = sub.subcommand().unwrap();
        assert_eq!(action, "full");
        assert_eq!(arg(sub, "selector").unwrap(), "xterm");
    }

    #[test]
    fn test_parse_tags_and_display() {
        let matches = cli().try_get_matches_from(["subtler", "view", "tag", ":www", "web", "2", "-d", ":1"]).unwrap();
        assert_eq!(opt(&matches, "display"), Some(":1"));
        let (_, sub) = matches.subcommand().unwrap();
        let (_, sub) = sub.subcommand().unwrap();
        assert_eq!(tag_args(sub).unwrap(), vec![Selector::from("web"), Selector::Index(2)]);
        assert_eq!(parse_selector::<View>(arg(sub, "selector").unwrap()).unwrap(), Selector::symbol("www"));
    }

    #[test]
    fn test_missing_selector_is_rejected() {
        assert!(cli().try_get_matches_from(["subtler", "client", "focus"]).is_err());
        assert!(cli().try_get_matches_from(["subtler", "gravity", "add", "half"]).is_err());
    }
}
